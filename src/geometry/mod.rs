pub mod aabb;
pub mod plane;
pub mod ray;

pub use aabb::Aabb;
pub use plane::{Plane, PointStatus};
pub use ray::{Ray, Side};
