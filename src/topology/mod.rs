pub mod edge;
pub mod face;
pub mod half_edge;
pub mod polyhedron;
pub mod ring;
pub mod vertex;

pub use edge::{Edge, EdgeKey};
pub use face::{Face, FaceKey};
pub use half_edge::{HalfEdge, HalfEdgeKey};
pub use polyhedron::Polyhedron;
pub use ring::{Link, Linked, Ring};
pub use vertex::{Vertex, VertexKey};

use slotmap::SlotMap;

/// Arena owning all vertices of one polyhedron.
pub type VertexArena = SlotMap<VertexKey, Vertex>;

/// Arena owning all half-edges of one polyhedron.
pub type HalfEdgeArena = SlotMap<HalfEdgeKey, HalfEdge>;

/// Arena owning all edges of one polyhedron.
pub type EdgeArena = SlotMap<EdgeKey, Edge>;

/// Arena owning all faces of one polyhedron.
pub type FaceArena<P> = SlotMap<FaceKey, Face<P>>;
