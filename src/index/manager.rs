//! Manager for property indices
//!
//! Keeps one [`PropertyIndex`] per registered (label, property) pair. The
//! owning store drives every update synchronously within its own mutation,
//! so an index is never behind the data it covers.

use super::property_index::PropertyIndex;
use crate::graph::{Label, NodeId, PropertyValue};
use indexmap::IndexMap;

/// Key identifying a property index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyIndexKey {
    pub label: Label,
    pub property: String,
}

impl PropertyIndexKey {
    fn new(label: &Label, property: &str) -> Self {
        Self {
            label: label.clone(),
            property: property.to_string(),
        }
    }
}

/// Manager for all property indices
///
/// IndexMap keeps registration order stable for introspection.
#[derive(Debug, Default)]
pub struct IndexManager {
    indices: IndexMap<PropertyIndexKey, PropertyIndex>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an index for a label and property; repeat registration is a no-op
    pub fn register(&mut self, label: Label, property: String) {
        let key = PropertyIndexKey { label, property };
        self.indices.entry(key).or_default();
    }

    /// Check whether an index is registered
    pub fn is_registered(&self, label: &Label, property: &str) -> bool {
        self.indices
            .contains_key(&PropertyIndexKey::new(label, property))
    }

    /// Record a property value for a node; no-op if no matching index exists
    pub fn index_insert(
        &mut self,
        label: &Label,
        property: &str,
        value: &PropertyValue,
        node_id: NodeId,
    ) {
        if let Some(index) = self.indices.get_mut(&PropertyIndexKey::new(label, property)) {
            index.insert(value.clone(), node_id);
        }
    }

    /// Drop a property value for a node; no-op if no matching index exists
    pub fn index_remove(
        &mut self,
        label: &Label,
        property: &str,
        value: &PropertyValue,
        node_id: NodeId,
    ) {
        if let Some(index) = self.indices.get_mut(&PropertyIndexKey::new(label, property)) {
            index.remove(value, node_id);
        }
    }

    /// Point lookup: `None` means no index registered (caller should fall
    /// back to a scan); `Some(empty)` means indexed but no match.
    pub fn lookup(
        &self,
        label: &Label,
        property: &str,
        value: &PropertyValue,
    ) -> Option<Vec<NodeId>> {
        self.indices
            .get(&PropertyIndexKey::new(label, property))
            .map(|index| index.get(value))
    }

    /// Registered (label, property) pairs, in registration order
    pub fn registered(&self) -> impl Iterator<Item = &PropertyIndexKey> {
        self.indices.keys()
    }

    /// Drop all indices
    pub fn clear(&mut self) {
        self.indices.clear();
    }
}
