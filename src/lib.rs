pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{PolycarveError, Result};
pub use topology::Polyhedron;
