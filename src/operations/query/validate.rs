use crate::error::Result;
use crate::topology::Polyhedron;

/// Runs the full topological and geometric validation of a solid:
/// closure, boundary consistency, planarity and convexity.
///
/// This is the whole-solid check the mutation paths run behind
/// `debug_assert!`; it is exposed as a query for tests and editor
/// diagnostics, and is too expensive for release hot paths.
pub struct CheckTopology;

impl CheckTopology {
    /// Creates a new `CheckTopology` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn execute<P>(&self, poly: &Polyhedron<P>) -> Result<()> {
        poly.validate()
    }
}

impl Default for CheckTopology {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use crate::math::Point3;
    use crate::operations::creation::MakeCuboid;

    fn unit_cube() -> Polyhedron {
        MakeCuboid::new(Aabb::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
        ))
        .execute()
    }

    #[test]
    fn well_formed_solid_passes() {
        assert!(CheckTopology::new().execute(&unit_cube()).is_ok());
    }

    #[test]
    fn empty_polyhedron_passes() {
        let empty: Polyhedron = Polyhedron::new();
        assert!(CheckTopology::new().execute(&empty).is_ok());
    }

    #[test]
    fn broken_face_reference_is_detected() {
        let mut cube = unit_cube();
        let h = cube.half_edges.keys().next().unwrap();
        cube.half_edges[h].set_face(None);
        assert!(CheckTopology::new().execute(&cube).is_err());
    }

    #[test]
    fn bent_face_is_detected() {
        let mut cube = unit_cube();
        let v = cube.vertices().next().unwrap();
        let old = cube.vertices[v].position();
        cube.vertices[v].set_position(old + crate::math::Vector3::new(0.0, 0.0, 0.25));
        assert!(CheckTopology::new().execute(&cube).is_err());
    }
}
