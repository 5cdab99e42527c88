use crate::math::{Point3, EPSILON};
use crate::operations::creation::convex_hull::hull_insert_point;
use crate::topology::Polyhedron;

use super::merge_faces::merge_all_coplanar;

/// Extends a solid to cover one more point, as direct vertex-handle
/// editing does when a handle is dragged outward.
///
/// The solid stays convex: the point is inserted with the same
/// visibility/horizon pass the hull construction uses, and coplanar
/// neighbour faces produced by the insertion are fused.
pub struct AddVertex {
    position: Point3,
}

impl AddVertex {
    /// Creates a new `AddVertex` operation.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self { position }
    }

    /// Executes the operation. Returns `false` when the point already
    /// lies inside or on the solid (nothing to add), or when the solid
    /// is empty.
    pub fn execute<P: Default>(&self, poly: &mut Polyhedron<P>) -> bool {
        if poly.is_empty() {
            return false;
        }
        if !hull_insert_point(poly, self.position) {
            return false;
        }
        merge_all_coplanar(poly, EPSILON);
        debug_assert!(poly.validate().is_ok());
        true
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
    fn pulling_a_point_above_a_face_adds_a_pyramid_tip() {
        let mut cube = unit_cube();
        let added = AddVertex::new(p(0.5, 0.5, 2.0)).execute(&mut cube);
        assert!(added);
        assert_eq!(cube.vertex_count(), 9);
        // The top face is replaced by four triangles to the tip.
        assert_eq!(cube.face_count(), 9);
        assert!(cube.validate().is_ok());
    }

    #[test]
    fn interior_point_changes_nothing() {
        let mut cube = unit_cube();
        let added = AddVertex::new(p(0.5, 0.5, 0.5)).execute(&mut cube);
        assert!(!added);
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.face_count(), 6);
    }

    #[test]
    fn point_on_the_surface_changes_nothing() {
        let mut cube = unit_cube();
        assert!(!AddVertex::new(p(0.5, 0.5, 1.0)).execute(&mut cube));
        assert_eq!(cube.vertex_count(), 8);
    }
}
