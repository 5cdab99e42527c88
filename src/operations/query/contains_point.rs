use crate::geometry::PointStatus;
use crate::math::{Point3, EPSILON};
use crate::topology::Polyhedron;

/// Classification of a point relative to a solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClassification {
    Inside,
    Outside,
    OnBoundary,
}

/// Classifies a point as inside, outside, or on the boundary of a
/// convex solid.
///
/// Convexity makes this a pure half-space test: a point above any face
/// plane is outside; a point below all of them is inside; on some
/// plane and below the rest, it lies on the boundary. The empty
/// polyhedron contains nothing.
pub struct ContainsPoint {
    point: Point3,
    epsilon: f64,
}

impl ContainsPoint {
    /// Creates a query with the kernel's default tolerance.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self::with_epsilon(point, EPSILON)
    }

    /// Creates a query with a caller-supplied boundary tolerance.
    #[must_use]
    pub fn with_epsilon(point: Point3, epsilon: f64) -> Self {
        Self { point, epsilon }
    }

    /// Executes the query.
    #[must_use]
    pub fn execute<P>(&self, poly: &Polyhedron<P>) -> PointClassification {
        if poly.is_empty() {
            return PointClassification::Outside;
        }
        let mut on_boundary = false;
        for f in poly.faces() {
            match poly.faces[f].point_status(
                &poly.half_edges,
                &poly.vertices,
                &self.point,
                self.epsilon,
            ) {
                PointStatus::Above => return PointClassification::Outside,
                PointStatus::On => on_boundary = true,
                PointStatus::Below => {}
            }
        }
        if on_boundary {
            PointClassification::OnBoundary
        } else {
            PointClassification::Inside
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use crate::operations::creation::MakeCuboid;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn unit_cube() -> Polyhedron {
        MakeCuboid::new(Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0))).execute()
    }

    #[test]
    fn center_is_inside() {
        let cube = unit_cube();
        assert_eq!(
            ContainsPoint::new(p(0.5, 0.5, 0.5)).execute(&cube),
            PointClassification::Inside
        );
    }

    #[test]
    fn far_point_is_outside() {
        let cube = unit_cube();
        assert_eq!(
            ContainsPoint::new(p(10.0, 10.0, 10.0)).execute(&cube),
            PointClassification::Outside
        );
    }

    #[test]
    fn face_point_is_on_boundary() {
        let cube = unit_cube();
        assert_eq!(
            ContainsPoint::new(p(0.5, 0.5, 1.0)).execute(&cube),
            PointClassification::OnBoundary
        );
    }

    #[test]
    fn corner_is_on_boundary() {
        let cube = unit_cube();
        assert_eq!(
            ContainsPoint::new(p(1.0, 1.0, 1.0)).execute(&cube),
            PointClassification::OnBoundary
        );
    }

    #[test]
    fn point_just_inside() {
        let cube = unit_cube();
        assert_eq!(
            ContainsPoint::new(p(0.001, 0.001, 0.001)).execute(&cube),
            PointClassification::Inside
        );
    }

    #[test]
    fn nothing_is_inside_the_empty_polyhedron() {
        let empty: Polyhedron = Polyhedron::new();
        assert_eq!(
            ContainsPoint::new(p(0.0, 0.0, 0.0)).execute(&empty),
            PointClassification::Outside
        );
    }
}
