pub mod bounding_box;
pub mod contains_point;
pub mod ray_pick;
pub mod validate;

pub use bounding_box::BoundingBox;
pub use contains_point::{ContainsPoint, PointClassification};
pub use ray_pick::{PickHit, RayPick};
pub use validate::CheckTopology;
