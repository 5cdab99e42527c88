use crate::geometry::Aabb;
use crate::math::EPSILON;
use crate::topology::{Polyhedron, VertexKey};

/// Indices into [`Aabb::corners`] for the six faces, counter-clockwise
/// when viewed from outside.
const FACE_CORNERS: [[usize; 4]; 6] = [
    [0, 3, 2, 1], // bottom, -Z
    [4, 5, 6, 7], // top, +Z
    [0, 1, 5, 4], // front, -Y
    [1, 2, 6, 5], // right, +X
    [2, 3, 7, 6], // back, +Y
    [3, 0, 4, 7], // left, -X
];

/// Creates an axis-aligned cuboid solid from a bounding box.
///
/// This is the seed volume for plane-based brush construction: the
/// world bounds made solid, to be carved down by clipping.
pub struct MakeCuboid {
    bounds: Aabb,
}

impl MakeCuboid {
    /// Creates a new `MakeCuboid` operation.
    #[must_use]
    pub fn new(bounds: Aabb) -> Self {
        Self { bounds }
    }

    /// Executes the operation, building the solid.
    ///
    /// A box thinner than the kernel tolerance on any axis yields the
    /// empty polyhedron.
    #[must_use]
    pub fn execute<P: Default>(&self) -> Polyhedron<P> {
        let size = self.bounds.size();
        if size.x < EPSILON || size.y < EPSILON || size.z < EPSILON {
            return Polyhedron::new();
        }

        let mut poly = Polyhedron::new();
        let corners = self.bounds.corners();
        let verts: Vec<VertexKey> = corners.iter().map(|&c| poly.new_vertex(c)).collect();

        let loops: Vec<Vec<VertexKey>> = FACE_CORNERS
            .iter()
            .map(|corners| corners.iter().map(|&i| verts[i]).collect())
            .collect();
        poly.weave_faces(&loops);

        debug_assert!(poly.is_valid());
        poly
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::PointStatus;
    use crate::math::Point3;
    use approx::assert_relative_eq;

    fn unit_cube() -> Polyhedron {
        MakeCuboid::new(Aabb::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
        ))
        .execute()
    }

    #[test]
    fn cube_has_euler_counts() {
        let cube = unit_cube();
        assert_eq!(cube.face_count(), 6);
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.edge_count(), 12);
        for f in cube.faces() {
            assert_eq!(cube.face(f).unwrap().vertex_count(), 4);
        }
    }

    #[test]
    fn cube_satisfies_all_invariants() {
        assert!(unit_cube().validate().is_ok());
    }

    #[test]
    fn cube_normals_point_outward() {
        let cube = unit_cube();
        let center = Point3::new(0.5, 0.5, 0.5);
        for f in cube.faces() {
            let normal = cube.face_normal(f).unwrap();
            let toward = cube.face_center(f).unwrap() - center;
            assert!(normal.dot(&toward) > 0.0, "inward normal on face {f:?}");
        }
    }

    #[test]
    fn cube_center_is_below_every_face() {
        let cube = unit_cube();
        let center = Point3::new(0.5, 0.5, 0.5);
        for f in cube.faces() {
            let face = cube.face(f).unwrap();
            let status =
                face.point_status(&cube.half_edges, &cube.vertices, &center, EPSILON);
            assert_eq!(status, PointStatus::Below);
        }
    }

    #[test]
    fn degenerate_box_yields_empty() {
        let flat: Polyhedron = MakeCuboid::new(Aabb::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ))
        .execute();
        assert!(flat.is_empty());
    }

    #[test]
    fn bounds_round_trip() {
        let bounds = Aabb::new(Point3::new(-2.0, 1.0, 0.0), Point3::new(3.0, 4.0, 5.0));
        let solid: Polyhedron = MakeCuboid::new(bounds).execute();
        let out = solid.bounds().unwrap();
        assert_relative_eq!((out.min - bounds.min).norm(), 0.0, epsilon = EPSILON);
        assert_relative_eq!((out.max - bounds.max).norm(), 0.0, epsilon = EPSILON);
    }
}
