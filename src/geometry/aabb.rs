use crate::math::{Point3, Vector3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a bounding box from two opposite corners, reordering the
    /// coordinates so that `min <= max` on every axis.
    #[must_use]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Smallest box containing all `points`, or `None` for an empty
    /// slice.
    #[must_use]
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::new(*first, *first);
        for p in &points[1..] {
            bounds.merge_point(p);
        }
        Some(bounds)
    }

    /// Grows the box to contain `point`.
    pub fn merge_point(&mut self, point: &Point3) {
        self.min = Point3::new(
            self.min.x.min(point.x),
            self.min.y.min(point.y),
            self.min.z.min(point.z),
        );
        self.max = Point3::new(
            self.max.x.max(point.x),
            self.max.y.max(point.y),
            self.max.z.max(point.z),
        );
    }

    /// True if `point` lies inside or on the boundary of the box.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Center point of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        self.min + (self.max - self.min) / 2.0
    }

    /// Extent of the box along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// The eight corner points, minimum corner first.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn new_reorders_corners() {
        let b = Aabb::new(p(1.0, -2.0, 3.0), p(-1.0, 2.0, 0.0));
        assert_eq!(b.min, p(-1.0, -2.0, 0.0));
        assert_eq!(b.max, p(1.0, 2.0, 3.0));
    }

    #[test]
    fn from_points_covers_all() {
        let b = Aabb::from_points(&[p(0.0, 0.0, 0.0), p(2.0, -1.0, 4.0), p(1.0, 3.0, 1.0)])
            .unwrap();
        assert_eq!(b.min, p(0.0, -1.0, 0.0));
        assert_eq!(b.max, p(2.0, 3.0, 4.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn contains_boundary_points() {
        let b = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        assert!(b.contains(&p(0.0, 0.5, 1.0)));
        assert!(!b.contains(&p(1.5, 0.5, 0.5)));
    }
}
