use tracing::debug;

use crate::geometry::{Aabb, Plane};
use crate::operations::modification::clip::{ClipPlane, ClipResult};
use crate::topology::Polyhedron;

use super::cuboid::MakeCuboid;

/// Builds a brush solid from its bounding planes.
///
/// The planes' normals point out of the solid. A seed cuboid spanning
/// the world bounds is clipped by each plane in turn, so the same plane
/// list, order and tolerance always rebuild the identical topology.
///
/// Fewer than four planes, or planes enclosing no volume, yield the
/// empty polyhedron rather than an error.
pub struct FromPlanes {
    planes: Vec<Plane>,
    bounds: Aabb,
}

impl FromPlanes {
    /// Creates a new `FromPlanes` operation over the given world
    /// bounds.
    #[must_use]
    pub fn new(planes: Vec<Plane>, bounds: Aabb) -> Self {
        Self { planes, bounds }
    }

    /// Executes the operation, building the solid.
    #[must_use]
    pub fn execute<P: Default>(&self) -> Polyhedron<P> {
        if self.planes.len() < 4 {
            debug!(planes = self.planes.len(), "too few planes for a solid");
            return Polyhedron::new();
        }

        let mut poly = MakeCuboid::new(self.bounds).execute();
        for plane in &self.planes {
            if ClipPlane::new(*plane).execute(&mut poly) == ClipResult::Emptied {
                debug!("planes enclose no volume");
                return poly;
            }
        }
        poly
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3, EPSILON};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn world() -> Aabb {
        Aabb::new(p(-16.0, -16.0, -16.0), p(16.0, 16.0, 16.0))
    }

    fn unit_cube_planes() -> Vec<Plane> {
        vec![
            Plane::from_point_normal(p(1.0, 0.0, 0.0), v(1.0, 0.0, 0.0)).unwrap(),
            Plane::from_point_normal(p(0.0, 0.0, 0.0), v(-1.0, 0.0, 0.0)).unwrap(),
            Plane::from_point_normal(p(0.0, 1.0, 0.0), v(0.0, 1.0, 0.0)).unwrap(),
            Plane::from_point_normal(p(0.0, 0.0, 0.0), v(0.0, -1.0, 0.0)).unwrap(),
            Plane::from_point_normal(p(0.0, 0.0, 1.0), v(0.0, 0.0, 1.0)).unwrap(),
            Plane::from_point_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, -1.0)).unwrap(),
        ]
    }

    #[test]
    fn six_planes_build_the_unit_cube() {
        let cube: Polyhedron = FromPlanes::new(unit_cube_planes(), world()).execute();
        assert_eq!(cube.face_count(), 6);
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.edge_count(), 12);
        for f in cube.faces() {
            assert_eq!(cube.face(f).unwrap().vertex_count(), 4);
        }
        assert!(cube.validate().is_ok());

        let bounds = cube.bounds().unwrap();
        assert_relative_eq!((bounds.min - p(0.0, 0.0, 0.0)).norm(), 0.0, epsilon = EPSILON);
        assert_relative_eq!((bounds.max - p(1.0, 1.0, 1.0)).norm(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn cube_face_normals_point_outward() {
        let cube: Polyhedron = FromPlanes::new(unit_cube_planes(), world()).execute();
        // The face lying on x = 1 reports the outward normal (1, 0, 0).
        let face = cube
            .faces()
            .find(|&f| {
                cube.face_vertex_positions(f)
                    .unwrap()
                    .iter()
                    .all(|q| (q.x - 1.0).abs() < EPSILON)
            })
            .unwrap();
        let normal = cube.face_normal(face).unwrap();
        assert_relative_eq!((normal - v(1.0, 0.0, 0.0)).norm(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn rebuild_is_deterministic() {
        let a: Polyhedron = FromPlanes::new(unit_cube_planes(), world()).execute();
        let b: Polyhedron = FromPlanes::new(unit_cube_planes(), world()).execute();
        assert_eq!(a.vertex_positions(), b.vertex_positions());
        let planes_a: Vec<_> = a.faces().map(|f| a.face_plane(f).unwrap().unwrap()).collect();
        let planes_b: Vec<_> = b.faces().map(|f| b.face_plane(f).unwrap().unwrap()).collect();
        assert_eq!(planes_a.len(), planes_b.len());
        for (pa, pb) in planes_a.iter().zip(&planes_b) {
            assert_relative_eq!((pa.normal() - pb.normal()).norm(), 0.0, epsilon = EPSILON);
            assert_relative_eq!(pa.distance(), pb.distance(), epsilon = EPSILON);
        }
    }

    #[test]
    fn too_few_planes_yield_empty() {
        let planes = unit_cube_planes().into_iter().take(3).collect();
        let poly: Polyhedron = FromPlanes::new(planes, world()).execute();
        assert!(poly.is_empty());
    }

    #[test]
    fn contradictory_planes_yield_empty() {
        let planes = vec![
            Plane::from_point_normal(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0)).unwrap(),
            Plane::from_point_normal(p(1.0, 0.0, 0.0), v(-1.0, 0.0, 0.0)).unwrap(),
            Plane::from_point_normal(p(0.0, 1.0, 0.0), v(0.0, 1.0, 0.0)).unwrap(),
            Plane::from_point_normal(p(0.0, 0.0, 1.0), v(0.0, 0.0, 1.0)).unwrap(),
        ];
        let poly: Polyhedron = FromPlanes::new(planes, world()).execute();
        assert!(poly.is_empty());
    }

    #[test]
    fn redundant_coplanar_plane_does_not_duplicate_a_face() {
        let mut planes = unit_cube_planes();
        planes.push(Plane::from_point_normal(p(1.0, 0.0, 0.0), v(1.0, 0.0, 0.0)).unwrap());
        let cube: Polyhedron = FromPlanes::new(planes, world()).execute();
        assert_eq!(cube.face_count(), 6);
    }
}
