//! Variable bindings produced by pattern matching
//!
//! One [`BindingSet`] is one assignment of pattern variables to concrete
//! node/edge handles satisfying a pattern walk.

use crate::graph::{EdgeId, NodeId};
use rustc_hash::FxHashMap;

/// A value bound to a pattern variable: either a node or an edge handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Binding {
    Node(NodeId),
    Edge(EdgeId),
}

impl Binding {
    /// Extract the node handle, if this binds a node
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Binding::Node(id) => Some(*id),
            Binding::Edge(_) => None,
        }
    }

    /// Extract the edge handle, if this binds an edge
    pub fn edge_id(&self) -> Option<EdgeId> {
        match self {
            Binding::Edge(id) => Some(*id),
            Binding::Node(_) => None,
        }
    }
}

/// A mapping from pattern-variable name to bound handle
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    bindings: FxHashMap<String, Binding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable to a value
    pub fn bind(&mut self, var: impl Into<String>, value: Binding) {
        self.bindings.insert(var.into(), value);
    }

    /// Get a bound value
    pub fn get(&self, var: &str) -> Option<&Binding> {
        self.bindings.get(var)
    }

    /// Get the node handle bound to `var`, if any
    pub fn node(&self, var: &str) -> Option<NodeId> {
        self.bindings.get(var).and_then(Binding::node_id)
    }

    /// Get the edge handle bound to `var`, if any
    pub fn edge(&self, var: &str) -> Option<EdgeId> {
        self.bindings.get(var).and_then(Binding::edge_id)
    }

    /// Check if a variable is bound
    pub fn has(&self, var: &str) -> bool {
        self.bindings.contains_key(var)
    }

    /// Merge another binding set into this one
    pub fn merge(&mut self, other: &BindingSet) {
        for (var, value) in &other.bindings {
            self.bindings.insert(var.clone(), *value);
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Sorted (variable, binding) pairs; the dedup key for DISTINCT semantics
    pub fn fingerprint(&self) -> Vec<(String, Binding)> {
        let mut pairs: Vec<(String, Binding)> = self
            .bindings
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        pairs.sort();
        pairs
    }
}
