//! Grafton
//!
//! An embeddable in-memory property-graph store with a declarative
//! pattern-matching query engine. Labeled nodes, directed typed
//! relationships, property-based point indexes, multi-hop pattern queries,
//! unweighted shortest paths, and grouped/ordered aggregation.
//!
//! Patterns are composable data values rather than query strings, so query
//! shapes are fixed, parameterized and testable in isolation.
//!
//! # Example
//!
//! ```rust
//! use grafton::graph::{EdgeSpec, GraphStore, NodeSpec};
//! use grafton::query::Queries;
//!
//! let mut store = GraphStore::new();
//! Queries::register_default_indexes(&mut store);
//!
//! let ids = store
//!     .create_nodes(vec![
//!         NodeSpec::new()
//!             .label("user")
//!             .property("name", "Brad Bob")
//!             .property("username", "bradbob"),
//!         NodeSpec::new().label("project").property("name", "flaming-aardvark"),
//!     ])
//!     .unwrap();
//! store
//!     .create_edges(vec![EdgeSpec::new(ids[1], "OWNED_BY", ids[0])])
//!     .unwrap();
//!
//! let queries = Queries::new(&store);
//! let owned = queries.projects_owned_by("bradbob").unwrap();
//! assert_eq!(owned[0].string_property("name"), Some("flaming-aardvark"));
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod db;
pub mod graph;
pub mod index;
pub mod query;

// Re-export main types for convenience
pub use algo::{shortest_path, Path, PathSegment};
pub use db::GraphDb;
pub use graph::{
    Edge, EdgeId, EdgeSpec, EdgeType, GraphError, GraphResult, GraphStore, Label, Node, NodeId,
    NodeSpec, PropertyMap, PropertyValue,
};
pub use index::IndexManager;
pub use query::{
    Aggregator, Binding, BindingSet, Direction, Matcher, NodeConstraint, Pattern, Queries,
    QueryError, QueryResult, RelStep, SortOrder,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
