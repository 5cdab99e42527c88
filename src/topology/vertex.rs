use crate::math::Point3;

use super::half_edge::HalfEdgeKey;
use super::ring::{Link, Linked};

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a polyhedron.
    pub struct VertexKey;
}

/// A corner of the polyhedron.
///
/// `leaving` is one incident half-edge whose origin is this vertex; any
/// incident half-edge qualifies, and the clip algorithm re-points it
/// when the current one is destroyed.
#[derive(Debug, Clone)]
pub struct Vertex {
    position: Point3,
    leaving: Option<HalfEdgeKey>,
    link: Link<VertexKey>,
}

impl Vertex {
    /// Creates an isolated vertex at `position`.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            leaving: None,
            link: Link::default(),
        }
    }

    /// The vertex position.
    #[must_use]
    pub fn position(&self) -> Point3 {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Point3) {
        self.position = position;
    }

    /// One half-edge leaving this vertex, if the vertex is connected.
    #[must_use]
    pub fn leaving(&self) -> Option<HalfEdgeKey> {
        self.leaving
    }

    pub(crate) fn set_leaving(&mut self, leaving: Option<HalfEdgeKey>) {
        self.leaving = leaving;
    }
}

impl Linked<VertexKey> for Vertex {
    fn link(&self) -> &Link<VertexKey> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<VertexKey> {
        &mut self.link
    }
}
