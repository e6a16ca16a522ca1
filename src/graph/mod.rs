//! Property graph data model and in-memory storage

mod edge;
mod node;
mod property;
mod store;
mod types;

pub use edge::Edge;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{EdgeSpec, GraphError, GraphResult, GraphStore, NodeSpec};
pub use types::{EdgeId, EdgeType, Label, NodeId};
