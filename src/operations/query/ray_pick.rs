use crate::geometry::{Ray, Side};
use crate::math::Point3;
use crate::topology::{FaceKey, Polyhedron};

/// A ray hit against one face of a solid.
#[derive(Debug, Clone, Copy)]
pub struct PickHit {
    /// The face that was hit.
    pub face: FaceKey,
    /// Ray parameter of the hit (world distance for a unit-direction
    /// ray).
    pub distance: f64,
    /// The hit point.
    pub point: Point3,
}

/// Finds the nearest front-face intersection of a ray with a solid,
/// the editor's pick query.
///
/// Back faces are ignored: picking through a solid selects the surface
/// facing the viewer. For a convex solid at most two faces intersect
/// any ray, and the nearer front face wins.
pub struct RayPick {
    ray: Ray,
}

impl RayPick {
    /// Creates a new `RayPick` query.
    #[must_use]
    pub fn new(ray: Ray) -> Self {
        Self { ray }
    }

    /// Executes the query. Returns `None` when the ray misses the
    /// solid entirely.
    #[must_use]
    pub fn execute<P>(&self, poly: &Polyhedron<P>) -> Option<PickHit> {
        poly.faces()
            .filter_map(|f| {
                let t = poly.faces[f].intersect_with_ray(
                    &poly.half_edges,
                    &poly.vertices,
                    &self.ray,
                    Side::Front,
                )?;
                Some(PickHit {
                    face: f,
                    distance: t,
                    point: self.ray.point_at(t),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
