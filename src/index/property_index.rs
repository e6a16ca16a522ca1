//! B-Tree based property index for point lookups

use crate::graph::{NodeId, PropertyValue};
use std::collections::BTreeMap;

/// Index for a specific property on a specific label
///
/// Maps a property value to the node handles carrying it, in insertion
/// order, so duplicate values resolve to a deterministic "first match".
#[derive(Debug, Clone, Default)]
pub struct PropertyIndex {
    index: BTreeMap<PropertyValue, Vec<NodeId>>,
}

impl PropertyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: PropertyValue, node_id: NodeId) {
        let bucket = self.index.entry(value).or_default();
        if !bucket.contains(&node_id) {
            bucket.push(node_id);
        }
    }

    pub fn remove(&mut self, value: &PropertyValue, node_id: NodeId) {
        if let Some(nodes) = self.index.get_mut(value) {
            nodes.retain(|&id| id != node_id);
            if nodes.is_empty() {
                self.index.remove(value);
            }
        }
    }

    /// Matching handles in insertion order; empty means no match, not an error
    pub fn get(&self, value: &PropertyValue) -> Vec<NodeId> {
        self.index.get(value).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
