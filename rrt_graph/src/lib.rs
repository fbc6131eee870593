pub use obstacle::Obstacle;
pub use rrt_parser::{Edge, Point, Segments};
pub use scene::*;

pub mod obstacle;
pub mod planner;
pub mod scene;
mod trace;
pub mod visualize;
