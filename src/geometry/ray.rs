use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, EPSILON};

use super::plane::Plane;

/// Which side of a face a ray is allowed to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Accept hits from either side.
    Both,
    /// Accept only hits against the front (normal) side.
    Front,
    /// Accept only hits against the back side.
    Back,
}

/// A ray with a unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Point3,
    direction: Vector3,
}

impl Ray {
    /// Creates a ray from an origin and a (not necessarily unit)
    /// direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction is zero-length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let len = direction.norm();
        if len < EPSILON {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Returns the ray origin.
    #[must_use]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Returns the unit direction.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Point along the ray at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }
}

/// Intersects a ray with a convex planar polygon given by its plane and
/// boundary vertex positions.
///
/// Returns the ray parameter of the hit, or `None` when the ray is
/// parallel to the plane, hits the rejected side, hits behind the
/// origin, or misses the polygon.
#[must_use]
pub fn intersect_polygon_with_ray(
    ray: &Ray,
    plane: &Plane,
    positions: &[Point3],
    side: Side,
) -> Option<f64> {
    let dot = plane.normal().dot(&ray.direction());
    if dot.abs() < EPSILON {
        return None;
    }
    match side {
        Side::Front if dot > 0.0 => return None,
        Side::Back if dot < 0.0 => return None,
        _ => {}
    }

    let t = -plane.signed_distance(&ray.origin()) / dot;
    if t < 0.0 {
        return None;
    }

    let hit = ray.point_at(t);
    point_in_polygon(&hit, &plane.normal(), positions).then_some(t)
}

/// Point-in-polygon test for a point coplanar with the polygon.
///
/// Projects onto the dominant-axis plane of the normal and evaluates
/// the winding number. Returns `true` for points inside or on the
/// boundary.
#[must_use]
pub fn point_in_polygon(point: &Point3, normal: &Vector3, positions: &[Point3]) -> bool {
    if positions.len() < 3 {
        return false;
    }

    let (u, v) = dominant_axes(normal);
    let px = point[u];
    let py = point[v];

    let mut winding = 0i32;
    let n = positions.len();
    for i in 0..n {
        let (x0, y0) = (positions[i][u], positions[i][v]);
        let (x1, y1) = (positions[(i + 1) % n][u], positions[(i + 1) % n][v]);

        if y0 <= py {
            if y1 > py && cross_2d(x1 - x0, y1 - y0, px - x0, py - y0) > 0.0 {
                winding += 1;
            }
        } else if y1 <= py && cross_2d(x1 - x0, y1 - y0, px - x0, py - y0) < 0.0 {
            winding -= 1;
        }
    }
    winding != 0
}

/// The two coordinate axes spanning the projection plane that drops the
/// dominant component of `normal`.
fn dominant_axes(normal: &Vector3) -> (usize, usize) {
    let (x, y, z) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
    if x >= y && x >= z {
        (1, 2)
    } else if y >= z {
        (2, 0)
    } else {
        (0, 1)
    }
}

/// 2D cross product: `ax * by - ay * bx`.
#[inline]
fn cross_2d(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
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

    fn unit_square_z0() -> Vec<Point3> {
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn ray_hits_square_from_above() {
        let ray = Ray::new(p(0.5, 0.5, 2.0), v(0.0, 0.0, -1.0)).unwrap();
        let plane = Plane::from_point_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        let t = intersect_polygon_with_ray(&ray, &plane, &unit_square_z0(), Side::Both).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = EPSILON);
    }

    #[test]
    fn ray_misses_outside_polygon() {
        let ray = Ray::new(p(3.0, 0.5, 2.0), v(0.0, 0.0, -1.0)).unwrap();
        let plane = Plane::from_point_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(
            intersect_polygon_with_ray(&ray, &plane, &unit_square_z0(), Side::Both).is_none()
        );
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(p(0.5, 0.5, 2.0), v(1.0, 0.0, 0.0)).unwrap();
        let plane = Plane::from_point_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(
            intersect_polygon_with_ray(&ray, &plane, &unit_square_z0(), Side::Both).is_none()
        );
    }

    #[test]
    fn back_side_filter_rejects_front_hit() {
        // Ray travels against the normal: that is a front-side hit.
        let ray = Ray::new(p(0.5, 0.5, 2.0), v(0.0, 0.0, -1.0)).unwrap();
        let plane = Plane::from_point_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(
            intersect_polygon_with_ray(&ray, &plane, &unit_square_z0(), Side::Back).is_none()
        );
        assert!(
            intersect_polygon_with_ray(&ray, &plane, &unit_square_z0(), Side::Front).is_some()
        );
    }

    #[test]
    fn hit_behind_origin_is_rejected() {
        let ray = Ray::new(p(0.5, 0.5, -1.0), v(0.0, 0.0, -1.0)).unwrap();
        let plane = Plane::from_point_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(
            intersect_polygon_with_ray(&ray, &plane, &unit_square_z0(), Side::Both).is_none()
        );
    }

    #[test]
    fn containment_on_steep_polygon_projects_correctly() {
        // Polygon in the x = 0 plane; dominant axis is X.
        let poly = vec![
            p(0.0, 0.0, 0.0),
            p(0.0, 2.0, 0.0),
            p(0.0, 2.0, 2.0),
            p(0.0, 0.0, 2.0),
        ];
        assert!(point_in_polygon(&p(0.0, 1.0, 1.0), &v(1.0, 0.0, 0.0), &poly));
        assert!(!point_in_polygon(&p(0.0, 3.0, 1.0), &v(1.0, 0.0, 0.0), &poly));
    }
}
