pub mod convex_hull;
pub mod cuboid;
pub mod from_planes;

pub use convex_hull::ConvexHull;
pub use cuboid::MakeCuboid;
pub use from_planes::FromPlanes;
