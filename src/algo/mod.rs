//! Graph algorithms

mod pathfinding;

pub use pathfinding::{shortest_path, Path, PathSegment};
