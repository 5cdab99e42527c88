use tracing::trace;

use crate::error::Result;
use crate::math::Point3;
use crate::topology::{Polyhedron, VertexKey};

/// Moves one vertex to a new position, as vertex-handle dragging does.
///
/// The move is applied and the full invariant set (planarity,
/// convexity, closure) re-validated; a move that would break the solid
/// is reverted and reported as rejected. Rejection is a defined
/// outcome, not an error.
pub struct MoveVertex {
    vertex: VertexKey,
    position: Point3,
}

impl MoveVertex {
    /// Creates a new `MoveVertex` operation.
    #[must_use]
    pub fn new(vertex: VertexKey, position: Point3) -> Self {
        Self { vertex, position }
    }

    /// Executes the move. Returns `Ok(false)` when the move was
    /// rejected and the solid left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex key is stale.
    pub fn execute<P>(&self, poly: &mut Polyhedron<P>) -> Result<bool> {
        poly.vertex(self.vertex)?;
        let old = poly.vertices[self.vertex].position();
        poly.vertices[self.vertex].set_position(self.position);
        if poly.validate().is_ok() {
            Ok(true)
        } else {
            trace!(vertex = ?self.vertex, "vertex move rejected");
            poly.vertices[self.vertex].set_position(old);
            Ok(false)
        }
    }
}
