use slotmap::Key;

use crate::error::{Result, TopologyError};
use crate::geometry::{Aabb, Plane, PointStatus};
use crate::math::{Point3, Vector3, EPSILON};

use super::edge::{Edge, EdgeKey};
use super::face::{Face, FaceKey};
use super::half_edge::{HalfEdge, HalfEdgeKey};
use super::ring::Ring;
use super::vertex::{Vertex, VertexKey};
use super::{EdgeArena, FaceArena, HalfEdgeArena, VertexArena};

/// A convex polyhedron as a half-edge boundary representation.
///
/// Owns every vertex, half-edge, edge and face in slotmap arenas;
/// entities reference each other by key, so structural edits are key
/// reassignments and teardown drains the arenas. The vertex, edge and
/// face rings preserve construction order, which keeps rebuilds from
/// the same plane set deterministic.
///
/// `P` is the application payload attached to each face (for a level
/// editor, texture-projection data); it defaults to `()`.
///
/// The *empty* polyhedron (all arenas empty) is a well-defined terminal
/// state meaning "fully clipped away", not an error.
#[derive(Debug, Clone)]
pub struct Polyhedron<P = ()> {
    pub(crate) vertices: VertexArena,
    pub(crate) half_edges: HalfEdgeArena,
    pub(crate) edges: EdgeArena,
    pub(crate) faces: FaceArena<P>,
    pub(crate) vertex_ring: Ring<VertexKey>,
    pub(crate) edge_ring: Ring<EdgeKey>,
    pub(crate) face_ring: Ring<FaceKey>,
}

impl<P> Default for Polyhedron<P> {
    fn default() -> Self {
        Self {
            vertices: VertexArena::with_key(),
            half_edges: HalfEdgeArena::with_key(),
            edges: EdgeArena::with_key(),
            faces: FaceArena::with_key(),
            vertex_ring: Ring::new(),
            edge_ring: Ring::new(),
            face_ring: Ring::new(),
        }
    }
}

impl<P> Polyhedron<P> {
    /// Creates an empty polyhedron.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the polyhedron holds no geometry at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.vertices.is_empty() && self.edges.is_empty()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertex keys in construction order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertex_ring.iter(&self.vertices)
    }

    /// Edge keys in construction order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edge_ring.iter(&self.edges)
    }

    /// Face keys in construction order.
    pub fn faces(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.face_ring.iter(&self.faces)
    }

    /// Returns a vertex, or an error for a stale key.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found.
    pub fn vertex(&self, key: VertexKey) -> Result<&Vertex> {
        self.vertices
            .get(key)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex").into())
    }

    /// Returns an edge, or an error for a stale key.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found.
    pub fn edge(&self, key: EdgeKey) -> Result<&Edge> {
        self.edges
            .get(key)
            .ok_or_else(|| TopologyError::EntityNotFound("edge").into())
    }

    /// Returns a half-edge, or an error for a stale key.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found.
    pub fn half_edge(&self, key: HalfEdgeKey) -> Result<&HalfEdge> {
        self.half_edges
            .get(key)
            .ok_or_else(|| TopologyError::EntityNotFound("half-edge").into())
    }

    /// Returns a face, or an error for a stale key.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found.
    pub fn face(&self, key: FaceKey) -> Result<&Face<P>> {
        self.faces
            .get(key)
            .ok_or_else(|| TopologyError::EntityNotFound("face").into())
    }

    /// Returns a face mutably, for payload editing.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found.
    pub fn face_mut(&mut self, key: FaceKey) -> Result<&mut Face<P>> {
        self.faces
            .get_mut(key)
            .ok_or_else(|| TopologyError::EntityNotFound("face").into())
    }

    /// The twin of `half_edge`, resolved through its owning edge.
    #[must_use]
    pub fn twin(&self, half_edge: HalfEdgeKey) -> Option<HalfEdgeKey> {
        let edge = self.half_edges.get(half_edge)?.edge()?;
        self.edges[edge].other(half_edge)
    }

    /// The vertex a boundary half-edge points to: the origin of the
    /// next half-edge in its cycle.
    #[must_use]
    pub fn destination(&self, half_edge: HalfEdgeKey) -> VertexKey {
        let next = self.half_edges[half_edge].next();
        debug_assert!(!next.is_null(), "destination of a detached half-edge");
        self.half_edges[next].origin()
    }

    /// The two vertices an edge connects.
    #[must_use]
    pub fn edge_endpoints(&self, edge: EdgeKey) -> (VertexKey, VertexKey) {
        let e = &self.edges[edge];
        let first = e.first();
        let second_origin = match e.second() {
            Some(second) => self.half_edges[second].origin(),
            None => self.destination(first),
        };
        (self.half_edges[first].origin(), second_origin)
    }

    // --- Per-face query wrappers for downstream consumers ---

    /// Boundary vertex positions of a face, in winding order.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found.
    pub fn face_vertex_positions(&self, face: FaceKey) -> Result<Vec<Point3>> {
        Ok(self
            .face(face)?
            .vertex_positions(&self.half_edges, &self.vertices))
    }

    /// Outward normal of a face; zero for a degenerate face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found.
    pub fn face_normal(&self, face: FaceKey) -> Result<Vector3> {
        Ok(self.face(face)?.normal(&self.half_edges, &self.vertices))
    }

    /// Plane of a face, or `None` for a degenerate face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found.
    pub fn face_plane(&self, face: FaceKey) -> Result<Option<Plane>> {
        Ok(self.face(face)?.plane(&self.half_edges, &self.vertices))
    }

    /// Arithmetic mean of a face's boundary vertex positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found.
    pub fn face_center(&self, face: FaceKey) -> Result<Point3> {
        Ok(self.face(face)?.center(&self.half_edges, &self.vertices))
    }

    /// Axis-aligned bounds of one face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found.
    pub fn face_bounds(&self, face: FaceKey) -> Result<Option<Aabb>> {
        Ok(self.face(face)?.bounds(&self.half_edges, &self.vertices))
    }

    /// Axis-aligned bounds of the whole solid, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        let first = self.vertices.values().next()?.position();
        let mut bounds = Aabb::new(first, first);
        for v in self.vertices.values() {
            bounds.merge_point(&v.position());
        }
        Some(bounds)
    }

    /// All vertex positions in construction order.
    #[must_use]
    pub fn vertex_positions(&self) -> Vec<Point3> {
        self.vertices()
            .map(|v| self.vertices[v].position())
            .collect()
    }

    /// Drops all geometry, leaving the well-defined empty state.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.half_edges.clear();
        self.edges.clear();
        self.faces.clear();
        self.vertex_ring.clear();
        self.edge_ring.clear();
        self.face_ring.clear();
    }

    // --- Low-level topology construction, used by the operations ---

    pub(crate) fn new_vertex(&mut self, position: Point3) -> VertexKey {
        let key = self.vertices.insert(Vertex::new(position));
        self.vertex_ring.push_back(&mut self.vertices, key);
        key
    }

    pub(crate) fn new_half_edge(&mut self, origin: VertexKey) -> HalfEdgeKey {
        self.half_edges.insert(HalfEdge::new(origin))
    }

    /// Pairs two opposite-direction half-edges under a new edge.
    pub(crate) fn pair_half_edges(&mut self, first: HalfEdgeKey, second: HalfEdgeKey) -> EdgeKey {
        debug_assert!(self.half_edges[first].edge().is_none());
        debug_assert!(self.half_edges[second].edge().is_none());
        debug_assert_ne!(
            self.half_edges[first].origin(),
            self.half_edges[second].origin()
        );
        let key = self.edges.insert(Edge::new(first, Some(second)));
        self.edge_ring.push_back(&mut self.edges, key);
        self.half_edges[first].set_edge(Some(key));
        self.half_edges[second].set_edge(Some(key));
        key
    }

    /// Creates a face adopting the given half-edge cycle, in order.
    pub(crate) fn new_face(&mut self, payload: P, boundary: &[HalfEdgeKey]) -> FaceKey {
        debug_assert!(boundary.len() >= 3);
        let key = self.faces.insert_with_key(|k| Face::new(k, payload));
        self.face_ring.push_back(&mut self.faces, key);
        let face = &mut self.faces[key];
        for &h in boundary {
            face.push_boundary(&mut self.half_edges, h);
        }
        for &h in boundary {
            let origin = self.half_edges[h].origin();
            self.vertices[origin].set_leaving(Some(h));
        }
        key
    }

    /// Splits a paired edge at `position`, producing a new on-edge
    /// vertex and a second edge. Both incident face boundaries gain one
    /// half-edge; the caller guarantees both sides are attached.
    pub(crate) fn split_edge(&mut self, edge: EdgeKey, position: Point3) -> VertexKey {
        let first = self.edges[edge].first();
        let second = self.edges[edge].second();
        debug_assert!(second.is_some(), "cannot split an unpaired edge");
        let Some(second) = second else {
            unreachable!("asserted above");
        };

        let w = self.new_vertex(position);
        let first_tail = self.new_half_edge(w);
        let second_tail = self.new_half_edge(w);

        let first_face = self.half_edges[first].face();
        let second_face = self.half_edges[second].face();
        debug_assert!(first_face.is_some() && second_face.is_some());
        if let Some(f) = first_face {
            self.faces[f].insert_into_boundary_after(&mut self.half_edges, first, first_tail);
        }
        if let Some(f) = second_face {
            self.faces[f].insert_into_boundary_after(&mut self.half_edges, second, second_tail);
        }

        // Old edge keeps the halves meeting at `w` from the first side;
        // a new edge takes the other pair.
        self.edges[edge].set_second(Some(second_tail));
        self.half_edges[second_tail].set_edge(Some(edge));
        self.half_edges[second].set_edge(None);
        let tail_edge = self.pair_half_edges(first_tail, second);
        debug_assert!(self.edges[tail_edge].is_paired());

        self.vertices[w].set_leaving(Some(first_tail));
        w
    }

    /// Builds faces over existing vertices from vertex loops (counter-
    /// clockwise from outside), pairing twin half-edges across loops by
    /// their directed endpoints. Every edge must be traversed by
    /// exactly two loops, once per direction.
    pub(crate) fn weave_faces(&mut self, loops: &[Vec<VertexKey>]) -> Vec<FaceKey>
    where
        P: Default,
    {
        let mut open: std::collections::HashMap<(VertexKey, VertexKey), HalfEdgeKey> =
            std::collections::HashMap::new();
        let mut faces = Vec::with_capacity(loops.len());
        for corners in loops {
            let mut boundary = Vec::with_capacity(corners.len());
            for (i, &origin) in corners.iter().enumerate() {
                let dest = corners[(i + 1) % corners.len()];
                let h = self.new_half_edge(origin);
                boundary.push(h);
                if let Some(twin) = open.remove(&(dest, origin)) {
                    self.pair_half_edges(twin, h);
                } else {
                    open.insert((origin, dest), h);
                }
            }
            faces.push(self.new_face(P::default(), &boundary));
        }
        debug_assert!(open.is_empty(), "unmatched half-edges after weaving");
        faces
    }

    pub(crate) fn destroy_vertex(&mut self, key: VertexKey) {
        self.vertex_ring.remove(&mut self.vertices, key, key, 1);
        self.vertices.remove(key);
    }

    pub(crate) fn destroy_edge(&mut self, key: EdgeKey) {
        self.edge_ring.remove(&mut self.edges, key, key, 1);
        self.edges.remove(key);
    }

    pub(crate) fn destroy_half_edge(&mut self, key: HalfEdgeKey) {
        debug_assert!(self.half_edges[key].face().is_none());
        self.half_edges.remove(key);
    }

    /// Removes a face from the polyhedron, detaching (not destroying)
    /// its boundary half-edges.
    pub(crate) fn detach_face(&mut self, key: FaceKey) {
        let boundary: Vec<HalfEdgeKey> = self.faces[key]
            .boundary()
            .iter(&self.half_edges)
            .collect();
        for h in boundary {
            self.half_edges[h].set_face(None);
        }
        self.face_ring.remove(&mut self.faces, key, key, 1);
        self.faces.remove(key);
    }

    /// Re-points every vertex's leaving half-edge at a live boundary
    /// half-edge. Used after bulk topology surgery.
    pub(crate) fn rebuild_leaving(&mut self) {
        for vertex in self.vertices.values_mut() {
            vertex.set_leaving(None);
        }
        for (key, half_edge) in &self.half_edges {
            if half_edge.face().is_some() {
                self.vertices[half_edge.origin()].set_leaving(Some(key));
            }
        }
    }

    // --- Invariant validation ---

    /// Checks the full set of structural and geometric invariants:
    /// closure (every edge has two half-edges with faces), boundary
    /// consistency, face planarity, and convexity.
    ///
    /// This is the expensive whole-solid check; production paths run it
    /// behind `debug_assert!` only. The empty polyhedron is valid.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] naming the first
    /// violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        self.validate_closure()?;
        self.validate_boundaries()?;
        self.validate_leaving()?;
        self.validate_convexity()?;
        Ok(())
    }

    /// True when [`Polyhedron::validate`] passes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate_closure(&self) -> Result<()> {
        if self.face_count() < 4 {
            return Err(invalid("closed solid needs at least 4 faces"));
        }
        for e in self.edges() {
            let edge = &self.edges[e];
            let Some(second) = edge.second() else {
                return Err(invalid("edge with unset second half-edge"));
            };
            for h in [edge.first(), second] {
                if self.half_edges[h].face().is_none() {
                    return Err(invalid("edge half-edge without a face"));
                }
            }
            let (a, b) = (
                self.half_edges[edge.first()].origin(),
                self.half_edges[second].origin(),
            );
            if a == b {
                return Err(invalid("edge connecting a vertex to itself"));
            }
            if self.destination(edge.first()) != b || self.destination(second) != a {
                return Err(invalid("twin half-edges do not oppose each other"));
            }
        }
        Ok(())
    }

    fn validate_boundaries(&self) -> Result<()> {
        for f in self.faces() {
            let face = &self.faces[f];
            if face.vertex_count() < 3 {
                return Err(invalid("face boundary with fewer than 3 half-edges"));
            }
            for h in face.boundary().iter(&self.half_edges) {
                let half_edge = &self.half_edges[h];
                if half_edge.face() != Some(f) {
                    return Err(invalid("boundary half-edge with wrong face reference"));
                }
                if half_edge.edge().is_none() {
                    return Err(invalid("boundary half-edge without an edge"));
                }
                if self.half_edges[half_edge.next()].previous() != h {
                    return Err(invalid("boundary links are not mutual"));
                }
            }
            let Some(plane) = face.plane(&self.half_edges, &self.vertices) else {
                return Err(invalid("degenerate face"));
            };
            let planar = face
                .vertex_positions(&self.half_edges, &self.vertices)
                .iter()
                .all(|p| plane.point_status(p, EPSILON) == PointStatus::On);
            if !planar {
                return Err(invalid("face boundary is not planar"));
            }
        }
        Ok(())
    }

    fn validate_leaving(&self) -> Result<()> {
        for v in self.vertices() {
            let Some(leaving) = self.vertices[v].leaving() else {
                return Err(invalid("vertex without a leaving half-edge"));
            };
            if self.half_edges.get(leaving).map(HalfEdge::origin) != Some(v) {
                return Err(invalid("leaving half-edge does not originate at its vertex"));
            }
        }
        Ok(())
    }

    fn validate_convexity(&self) -> Result<()> {
        for f in self.faces() {
            let face = &self.faces[f];
            for v in self.vertices() {
                let position = self.vertices[v].position();
                let status =
                    face.point_status(&self.half_edges, &self.vertices, &position, EPSILON);
                if status == PointStatus::Above {
                    return Err(invalid("vertex above a face plane: shell is not convex"));
                }
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> crate::error::PolycarveError {
    TopologyError::InvalidTopology(message.into()).into()
}
