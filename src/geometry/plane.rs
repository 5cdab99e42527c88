use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, ANGULAR_EPSILON, EPSILON};

/// Classification of a point relative to a plane.
///
/// "Above" is the side the normal points into; for an outward-oriented
/// face plane of a convex solid, above means outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointStatus {
    /// Point is on the normal side of the plane, beyond tolerance.
    Above,
    /// Point is on the opposite side, beyond tolerance.
    Below,
    /// Point lies on the plane within tolerance.
    On,
}

/// An oriented plane in 3D space, stored as `normal · x = distance`
/// with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vector3,
    distance: f64,
}

impl Plane {
    /// Creates a plane from a (not necessarily unit) normal and the
    /// signed distance of the plane from the origin along it.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length.
    pub fn new(normal: Vector3, distance: f64) -> Result<Self> {
        let len = normal.norm();
        if len < EPSILON {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            normal: normal / len,
            distance: distance / len,
        })
    }

    /// Creates a plane through `point` with the given normal.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length.
    pub fn from_point_normal(point: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < EPSILON {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;
        Ok(Self {
            normal,
            distance: normal.dot(&point.coords),
        })
    }

    /// Creates a plane through three points, with the normal following
    /// the counter-clockwise winding of `a`, `b`, `c`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points are collinear.
    pub fn from_points(a: Point3, b: Point3, c: Point3) -> Result<Self> {
        let cross = (b - a).cross(&(c - a));
        if cross.norm() < EPSILON {
            return Err(GeometryError::Degenerate("collinear plane points".into()).into());
        }
        Self::from_point_normal(a, cross)
    }

    /// Returns the unit normal.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    /// Returns the signed distance of the plane from the origin.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns a point on the plane.
    #[must_use]
    pub fn anchor(&self) -> Point3 {
        Point3::from(self.normal * self.distance)
    }

    /// Returns the same plane with opposite orientation.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    /// Signed distance from `point` to the plane; positive on the
    /// normal side.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) - self.distance
    }

    /// Classifies `point` against the plane with `epsilon` as the
    /// on-plane half-width.
    ///
    /// Points within `epsilon` resolve to [`PointStatus::On`]
    /// deterministically, so repeated edits at the tolerance boundary
    /// never flip-flop between sides.
    #[must_use]
    pub fn point_status(&self, point: &Point3, epsilon: f64) -> PointStatus {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PointStatus::Above
        } else if dist < -epsilon {
            PointStatus::Below
        } else {
            PointStatus::On
        }
    }

    /// True if the two planes' normals are parallel (either direction)
    /// within the angular tolerance.
    #[must_use]
    pub fn parallel_to(&self, other: &Self) -> bool {
        1.0 - self.normal.dot(&other.normal).abs() < ANGULAR_EPSILON
    }

    /// Parameter `t` in `[0, 1]` at which the segment `from → to`
    /// crosses the plane, by linear interpolation of the signed
    /// distances at the endpoints.
    ///
    /// Meaningful only when the endpoints lie on strictly opposite
    /// sides; asserted in debug builds.
    #[must_use]
    pub fn intersect_segment(&self, from: &Point3, to: &Point3) -> f64 {
        let d_from = self.signed_distance(from);
        let d_to = self.signed_distance(to);
        debug_assert!(
            d_from * d_to < 0.0,
            "segment endpoints must straddle the plane"
        );
        d_from / (d_from - d_to)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    #[test]
    fn from_points_follows_winding() {
        let plane =
            Plane::from_points(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)).unwrap();
        assert_relative_eq!(plane.normal().z, 1.0, epsilon = EPSILON);
        assert_relative_eq!(plane.distance(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let result = Plane::from_points(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0));
        assert!(result.is_err());
    }

    #[test]
    fn signed_distance_has_sign_of_normal_side() {
        let plane = Plane::from_point_normal(p(0.0, 0.0, 1.0), v(0.0, 0.0, 1.0)).unwrap();
        assert_relative_eq!(plane.signed_distance(&p(0.0, 0.0, 3.0)), 2.0, epsilon = EPSILON);
        assert_relative_eq!(plane.signed_distance(&p(5.0, 5.0, 0.0)), -1.0, epsilon = EPSILON);
    }

    #[test]
    fn point_status_uses_epsilon_band() {
        let plane = Plane::from_point_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(plane.point_status(&p(0.0, 0.0, 1.0), EPSILON), PointStatus::Above);
        assert_eq!(plane.point_status(&p(0.0, 0.0, -1.0), EPSILON), PointStatus::Below);
        assert_eq!(
            plane.point_status(&p(0.0, 0.0, EPSILON / 2.0), EPSILON),
            PointStatus::On
        );
        assert_eq!(
            plane.point_status(&p(0.0, 0.0, -EPSILON / 2.0), EPSILON),
            PointStatus::On
        );
    }

    #[test]
    fn parallel_detects_antiparallel_normals() {
        let a = Plane::from_point_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        let b = Plane::from_point_normal(p(0.0, 0.0, 4.0), v(0.0, 0.0, -1.0)).unwrap();
        assert!(a.parallel_to(&b));
    }

    #[test]
    fn segment_interpolation_parameter() {
        let plane = Plane::from_point_normal(p(0.0, 0.0, 1.0), v(0.0, 0.0, 1.0)).unwrap();
        let t = plane.intersect_segment(&p(0.0, 0.0, 0.0), &p(0.0, 0.0, 4.0));
        assert_relative_eq!(t, 0.25, epsilon = EPSILON);
    }
}
