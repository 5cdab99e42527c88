use super::edge::EdgeKey;
use super::face::FaceKey;
use super::ring::{Link, Linked};
use super::vertex::VertexKey;

slotmap::new_key_type! {
    /// Unique identifier for a half-edge in a polyhedron.
    pub struct HalfEdgeKey;
}

/// One directed traversal segment of a face boundary.
///
/// The intrusive link forms the boundary cycle of the owning face; the
/// destination vertex is the origin of the next half-edge in that
/// cycle. The twin is reached through the owning [`Edge`](super::Edge),
/// which stores the pairing once.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    origin: VertexKey,
    face: Option<FaceKey>,
    edge: Option<EdgeKey>,
    link: Link<HalfEdgeKey>,
}

impl HalfEdge {
    /// Creates an unpaired, faceless half-edge leaving `origin`.
    #[must_use]
    pub fn new(origin: VertexKey) -> Self {
        Self {
            origin,
            face: None,
            edge: None,
            link: Link::default(),
        }
    }

    /// The vertex this half-edge leaves.
    #[must_use]
    pub fn origin(&self) -> VertexKey {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: VertexKey) {
        self.origin = origin;
    }

    /// The face whose boundary this half-edge belongs to, if adopted.
    #[must_use]
    pub fn face(&self) -> Option<FaceKey> {
        self.face
    }

    pub(crate) fn set_face(&mut self, face: Option<FaceKey>) {
        self.face = face;
    }

    /// The undirected edge pairing this half-edge with its twin, if
    /// paired.
    #[must_use]
    pub fn edge(&self) -> Option<EdgeKey> {
        self.edge
    }

    pub(crate) fn set_edge(&mut self, edge: Option<EdgeKey>) {
        self.edge = edge;
    }

    /// The next half-edge in the owning face's boundary cycle.
    ///
    /// Null when the half-edge is detached from any boundary.
    #[must_use]
    pub fn next(&self) -> HalfEdgeKey {
        self.link.next()
    }

    /// The previous half-edge in the owning face's boundary cycle.
    #[must_use]
    pub fn previous(&self) -> HalfEdgeKey {
        self.link.prev()
    }
}

impl Linked<HalfEdgeKey> for HalfEdge {
    fn link(&self) -> &Link<HalfEdgeKey> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<HalfEdgeKey> {
        &mut self.link
    }
}
