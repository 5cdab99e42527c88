use std::collections::HashSet;

use crate::geometry::ray::{intersect_polygon_with_ray, Ray, Side};
use crate::geometry::{Aabb, Plane, PointStatus};
use crate::math::{centroid, Point3, Vector3, EPSILON};

use super::half_edge::HalfEdgeKey;
use super::ring::{Link, Linked, Ring};
use super::vertex::VertexKey;
use super::{HalfEdgeArena, VertexArena};

slotmap::new_key_type! {
    /// Unique identifier for a face in a polyhedron.
    pub struct FaceKey;
}

/// A closed boundary loop of half-edges, counter-clockwise when viewed
/// from outside, plus an application-defined payload (e.g. the editor's
/// texture-projection data).
///
/// Geometric properties (normal, plane, center, bounds) are derived
/// from the boundary on demand, never cached. Query methods take the
/// half-edge and vertex arenas as context; mutation primitives keep the
/// half-edges' `face` back-references consistent with boundary
/// membership and `debug_assert!` their preconditions.
#[derive(Debug, Clone)]
pub struct Face<P> {
    id: FaceKey,
    boundary: Ring<HalfEdgeKey>,
    payload: P,
    link: Link<FaceKey>,
}

impl<P> Face<P> {
    /// Creates a face with an empty boundary; the owner splices
    /// half-edges in afterwards.
    #[must_use]
    pub fn new(id: FaceKey, payload: P) -> Self {
        Self {
            id,
            boundary: Ring::new(),
            payload,
            link: Link::default(),
        }
    }

    /// This face's own key.
    #[must_use]
    pub fn id(&self) -> FaceKey {
        self.id
    }

    /// The application payload.
    #[must_use]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Replaces the application payload.
    pub fn set_payload(&mut self, payload: P) {
        self.payload = payload;
    }

    /// The boundary cycle.
    #[must_use]
    pub fn boundary(&self) -> &Ring<HalfEdgeKey> {
        &self.boundary
    }

    /// Number of boundary half-edges (equals the number of vertices).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.boundary.len()
    }

    // --- Geometric queries ---

    /// Boundary vertex positions in winding order.
    #[must_use]
    pub fn vertex_positions(
        &self,
        half_edges: &HalfEdgeArena,
        vertices: &VertexArena,
    ) -> Vec<Point3> {
        self.boundary
            .iter(half_edges)
            .map(|h| vertices[half_edges[h].origin()].position())
            .collect()
    }

    /// The set of boundary vertices.
    #[must_use]
    pub fn vertex_set(&self, half_edges: &HalfEdgeArena) -> HashSet<VertexKey> {
        self.boundary
            .iter(half_edges)
            .map(|h| half_edges[h].origin())
            .collect()
    }

    /// Position of the first boundary vertex; the anchor for this
    /// face's plane.
    #[must_use]
    pub fn origin(&self, half_edges: &HalfEdgeArena, vertices: &VertexArena) -> Option<Point3> {
        let first = self.boundary.first()?;
        Some(vertices[half_edges[first].origin()].position())
    }

    /// The boundary half-edge whose origin is `vertex`, found by a
    /// full-cycle scan.
    #[must_use]
    pub fn find_half_edge(
        &self,
        half_edges: &HalfEdgeArena,
        vertex: VertexKey,
    ) -> Option<HalfEdgeKey> {
        self.boundary
            .iter(half_edges)
            .find(|&h| half_edges[h].origin() == vertex)
    }

    /// The boundary half-edge whose origin lies within `epsilon` of
    /// `position`, found by a full-cycle scan.
    #[must_use]
    pub fn find_half_edge_at(
        &self,
        half_edges: &HalfEdgeArena,
        vertices: &VertexArena,
        position: &Point3,
        epsilon: f64,
    ) -> Option<HalfEdgeKey> {
        self.boundary.iter(half_edges).find(|&h| {
            (vertices[half_edges[h].origin()].position() - position).norm() <= epsilon
        })
    }

    /// The outward face normal: the first non-degenerate cross product
    /// over consecutive boundary vertex triples, normalized.
    ///
    /// Returns the zero vector only when every triple is collinear;
    /// callers must treat that as "face degenerate".
    #[must_use]
    pub fn normal(&self, half_edges: &HalfEdgeArena, vertices: &VertexArena) -> Vector3 {
        for h in self.boundary.iter(half_edges) {
            let n1 = half_edges[h].next();
            let n2 = half_edges[n1].next();
            let p1 = vertices[half_edges[h].origin()].position();
            let p2 = vertices[half_edges[n1].origin()].position();
            let p3 = vertices[half_edges[n2].origin()].position();
            let cross = (p2 - p1).cross(&(p3 - p1));
            let len = cross.norm();
            if len > EPSILON {
                return cross / len;
            }
        }
        Vector3::zeros()
    }

    /// The plane this face lies in, or `None` for a degenerate face.
    #[must_use]
    pub fn plane(&self, half_edges: &HalfEdgeArena, vertices: &VertexArena) -> Option<Plane> {
        let normal = self.normal(half_edges, vertices);
        if normal == Vector3::zeros() {
            return None;
        }
        let origin = self.origin(half_edges, vertices)?;
        Plane::from_point_normal(origin, normal).ok()
    }

    /// Arithmetic mean of the boundary vertex positions.
    #[must_use]
    pub fn center(&self, half_edges: &HalfEdgeArena, vertices: &VertexArena) -> Point3 {
        centroid(&self.vertex_positions(half_edges, vertices))
    }

    /// Axis-aligned bounds of the boundary, or `None` for an empty
    /// boundary.
    #[must_use]
    pub fn bounds(&self, half_edges: &HalfEdgeArena, vertices: &VertexArena) -> Option<Aabb> {
        Aabb::from_points(&self.vertex_positions(half_edges, vertices))
    }

    /// Classifies `point` against this face's plane with `epsilon` as
    /// the on-plane half-width. Degenerate faces classify everything as
    /// on-plane.
    #[must_use]
    pub fn point_status(
        &self,
        half_edges: &HalfEdgeArena,
        vertices: &VertexArena,
        point: &Point3,
        epsilon: f64,
    ) -> PointStatus {
        match self.plane(half_edges, vertices) {
            Some(plane) => plane.point_status(point, epsilon),
            None => PointStatus::On,
        }
    }

    /// Intersects a ray with this face.
    ///
    /// Rejects rays parallel to the face plane and, when `side`
    /// restricts the test, hits against the excluded side. Returns the
    /// ray parameter of the hit or `None`.
    #[must_use]
    pub fn intersect_with_ray(
        &self,
        half_edges: &HalfEdgeArena,
        vertices: &VertexArena,
        ray: &Ray,
        side: Side,
    ) -> Option<f64> {
        let plane = self.plane(half_edges, vertices)?;
        let positions = self.vertex_positions(half_edges, vertices);
        intersect_polygon_with_ray(ray, &plane, &positions, side)
    }

    /// True iff the two faces' normals are parallel and every vertex of
    /// each face lies within `epsilon` of the other's plane.
    #[must_use]
    pub fn coplanar(
        &self,
        half_edges: &HalfEdgeArena,
        vertices: &VertexArena,
        other: &Self,
        epsilon: f64,
    ) -> bool {
        let (Some(my_plane), Some(other_plane)) = (
            self.plane(half_edges, vertices),
            other.plane(half_edges, vertices),
        ) else {
            return false;
        };
        if !my_plane.parallel_to(&other_plane) {
            return false;
        }
        let on = |plane: &Plane, face: &Self| {
            face.vertex_positions(half_edges, vertices)
                .iter()
                .all(|p| plane.point_status(p, epsilon) == PointStatus::On)
        };
        on(&my_plane, other) && on(&other_plane, self)
    }

    /// Size of the intersection of the two faces' vertex sets.
    #[must_use]
    pub fn count_shared_vertices(&self, half_edges: &HalfEdgeArena, other: &Self) -> usize {
        let mine = self.vertex_set(half_edges);
        other
            .boundary
            .iter(half_edges)
            .filter(|&h| mine.contains(&half_edges[h].origin()))
            .count()
    }

    // --- Boundary mutation primitives ---

    /// Reverses the boundary winding.
    pub fn flip(&mut self, half_edges: &mut HalfEdgeArena) {
        self.boundary.reverse(half_edges);
    }

    /// Appends a faceless half-edge at the end of the boundary cycle,
    /// adopting it.
    pub(crate) fn push_boundary(&mut self, half_edges: &mut HalfEdgeArena, edge: HalfEdgeKey) {
        debug_assert!(half_edges[edge].face().is_none());
        half_edges[edge].set_face(Some(self.id));
        self.boundary.push_back(half_edges, edge);
    }

    /// Splices a faceless half-edge into the boundary immediately
    /// before `anchor`, adopting it.
    pub fn insert_into_boundary_before(
        &mut self,
        half_edges: &mut HalfEdgeArena,
        anchor: HalfEdgeKey,
        edge: HalfEdgeKey,
    ) {
        debug_assert_eq!(half_edges[anchor].face(), Some(self.id));
        debug_assert!(half_edges[edge].face().is_none());
        half_edges[edge].set_face(Some(self.id));
        self.boundary.insert_before(half_edges, anchor, edge, 1);
    }

    /// Splices a faceless half-edge into the boundary immediately after
    /// `anchor`, adopting it.
    pub fn insert_into_boundary_after(
        &mut self,
        half_edges: &mut HalfEdgeArena,
        anchor: HalfEdgeKey,
        edge: HalfEdgeKey,
    ) {
        debug_assert_eq!(half_edges[anchor].face(), Some(self.id));
        debug_assert!(half_edges[edge].face().is_none());
        half_edges[edge].set_face(Some(self.id));
        self.boundary.insert_after(half_edges, anchor, edge, 1);
    }

    /// Detaches the closed boundary run `[from, to]`, unsetting `face`
    /// on every removed half-edge. Returns the number removed; the
    /// caller owns their destruction.
    pub fn remove_from_boundary(
        &mut self,
        half_edges: &mut HalfEdgeArena,
        from: HalfEdgeKey,
        to: HalfEdgeKey,
    ) -> usize {
        let count = self.unset_face_run(half_edges, from, to);
        self.boundary.remove(half_edges, from, to, count);
        count
    }

    /// Atomically replaces the closed boundary run `[from, to]` with
    /// the run of `with_count` faceless half-edges starting at `with`,
    /// keeping all `face` back-references consistent. Returns the
    /// number removed.
    pub fn replace_boundary(
        &mut self,
        half_edges: &mut HalfEdgeArena,
        from: HalfEdgeKey,
        to: HalfEdgeKey,
        with: HalfEdgeKey,
        with_count: usize,
    ) -> usize {
        let removed = self.unset_face_run(half_edges, from, to);
        let mut cursor = with;
        for _ in 0..with_count {
            debug_assert!(half_edges[cursor].face().is_none());
            half_edges[cursor].set_face(Some(self.id));
            cursor = half_edges[cursor].next();
        }
        self.boundary
            .replace(half_edges, from, to, removed, with, with_count);
        removed
    }

    /// Swaps in a wholly new boundary cycle, unsetting `face` on the
    /// old half-edges and setting it on the new ones. Returns the old
    /// boundary; the caller owns its cleanup.
    pub fn replace_entire_boundary(
        &mut self,
        half_edges: &mut HalfEdgeArena,
        new_boundary: Ring<HalfEdgeKey>,
    ) -> Ring<HalfEdgeKey> {
        for h in self.boundary.iter(half_edges).collect::<Vec<_>>() {
            half_edges[h].set_face(None);
        }
        let old = std::mem::replace(&mut self.boundary, new_boundary);
        for h in self.boundary.iter(half_edges).collect::<Vec<_>>() {
            half_edges[h].set_face(Some(self.id));
        }
        old
    }

    fn unset_face_run(
        &mut self,
        half_edges: &mut HalfEdgeArena,
        from: HalfEdgeKey,
        to: HalfEdgeKey,
    ) -> usize {
        let mut count = 0;
        let mut cursor = from;
        loop {
            debug_assert_eq!(half_edges[cursor].face(), Some(self.id));
            half_edges[cursor].set_face(None);
            count += 1;
            if cursor == to {
                break;
            }
            cursor = half_edges[cursor].next();
        }
        count
    }
}

impl<P> Linked<FaceKey> for Face<P> {
    fn link(&self) -> &Link<FaceKey> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<FaceKey> {
        &mut self.link
    }
}
