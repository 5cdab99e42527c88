use crate::geometry::Aabb;
use crate::topology::Polyhedron;

/// Computes the axis-aligned bounding box of a solid, the broad-phase
/// volume used for culling and octree insertion.
pub struct BoundingBox;

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query. Returns `None` for the empty polyhedron.
    #[must_use]
    pub fn execute<P>(&self, poly: &Polyhedron<P>) -> Option<Aabb> {
        poly.bounds()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::MakeCuboid;

    #[test]
    fn bounds_of_a_cuboid_match_its_extents() {
        let bounds = Aabb::new(Point3::new(-1.0, 0.0, 2.0), Point3::new(3.0, 4.0, 5.0));
        let solid: Polyhedron = MakeCuboid::new(bounds).execute();
        let out = BoundingBox::new().execute(&solid).unwrap();
        assert_eq!(out.min, bounds.min);
        assert_eq!(out.max, bounds.max);
    }

    #[test]
    fn empty_solid_has_no_bounds() {
        let empty: Polyhedron = Polyhedron::new();
        assert!(BoundingBox::new().execute(&empty).is_none());
    }
}
