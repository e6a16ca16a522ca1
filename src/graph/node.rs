//! Node implementation for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{Label, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A node in the property graph
///
/// Owned exclusively by the [`GraphStore`](super::GraphStore); callers hold
/// `NodeId` handles or cloned snapshots. The property/label accessors form
/// the read-only entity view handed to external formatters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Set of labels for this node
    pub labels: HashSet<Label>,

    /// Properties associated with this node
    pub properties: PropertyMap,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Node {
    /// Create a new node with labels and properties
    pub fn new(id: NodeId, labels: Vec<Label>, properties: PropertyMap) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Node {
            id,
            labels: labels.into_iter().collect(),
            properties,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a label to this node
    pub fn add_label(&mut self, label: impl Into<Label>) {
        self.labels.insert(label.into());
        self.touch();
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// The node's label set
    pub fn labels(&self) -> &HashSet<Label> {
        &self.labels
    }

    /// Set a property value, returning the previous value if any
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        let old = self.properties.insert(key.into(), value.into());
        self.touch();
        old
    }

    /// Get a property value
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Get a property as a string slice, if present and a string
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_string())
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_labels() {
        let mut node = Node::new(NodeId::new(1), vec![Label::new("user")], PropertyMap::new());
        assert!(node.has_label(&Label::new("user")));
        assert!(!node.has_label(&Label::new("project")));

        node.add_label("admin");
        assert!(node.has_label(&Label::new("admin")));
        assert_eq!(node.labels().len(), 2);
    }

    #[test]
    fn test_node_properties() {
        let mut props = PropertyMap::new();
        props.insert("username".to_string(), "bradbob".into());

        let mut node = Node::new(NodeId::new(7), vec![Label::new("user")], props);
        assert_eq!(node.string_property("username"), Some("bradbob"));
        assert!(node.property("name").is_none());

        let old = node.set_property("username", "bettyzoe");
        assert_eq!(old.unwrap().as_string(), Some("bradbob"));
        assert_eq!(node.string_property("username"), Some("bettyzoe"));
    }

    #[test]
    fn test_node_without_labels() {
        let node = Node::new(NodeId::new(2), vec![], PropertyMap::new());
        assert!(node.labels().is_empty());
    }
}
