use tracing::debug;

use crate::error::Result;
use crate::math::Point3;
use crate::operations::creation::ConvexHull;
use crate::topology::{Polyhedron, VertexKey};

/// Deletes one vertex and rebuilds the solid as the hull of the
/// remaining vertex positions.
///
/// Removing a vertex of a convex solid always yields a convex solid;
/// rebuilding from positions keeps the result deterministic. If too few
/// vertices remain for a solid, the polyhedron becomes empty, which is
/// a defined state the caller handles rather than an error. Face
/// payloads are reset by the rebuild.
pub struct RemoveVertex {
    vertex: VertexKey,
}

impl RemoveVertex {
    /// Creates a new `RemoveVertex` operation.
    #[must_use]
    pub fn new(vertex: VertexKey) -> Self {
        Self { vertex }
    }

    /// Executes the removal.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex key is stale.
    pub fn execute<P: Default>(&self, poly: &mut Polyhedron<P>) -> Result<()> {
        poly.vertex(self.vertex)?;
        let remaining: Vec<Point3> = poly
            .vertices()
            .filter(|&v| v != self.vertex)
            .map(|v| poly.vertices[v].position())
            .collect();
        *poly = ConvexHull::new(remaining).execute();
        if poly.is_empty() {
            debug!("removing the vertex left no solid");
        }
        Ok(())
    }
}
