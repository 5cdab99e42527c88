pub mod add_vertex;
pub mod clip;
pub mod merge_faces;
pub mod move_vertex;
pub mod remove_vertex;
pub mod snap_grid;

pub use add_vertex::AddVertex;
pub use clip::{ClipPlane, ClipResult};
pub use merge_faces::MergeFaces;
pub use move_vertex::MoveVertex;
pub use remove_vertex::RemoveVertex;
pub use snap_grid::SnapGrid;
