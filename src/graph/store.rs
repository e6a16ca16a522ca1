//! In-memory graph storage
//!
//! The store is the single source of truth for nodes, edges, their labels
//! and properties. All structural mutation goes through `&mut self`, so a
//! writer is exclusive by construction and readers always observe a
//! consistent snapshot.

use super::edge::Edge;
use super::node::Node;
use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeType, Label, NodeId};
use crate::index::IndexManager;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("edge endpoint {0} does not exist")]
    DanglingReference(NodeId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Specification for one node in a bulk-create call
#[derive(Debug, Clone, Default)]
pub struct NodeSpec {
    pub labels: Vec<Label>,
    pub properties: PropertyMap,
}

impl NodeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<Label>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Specification for one edge in a bulk-create call
///
/// Argument order mirrors the `(start)-[TYPE]->(end)` triple shape.
#[derive(Debug, Clone)]
pub struct EdgeSpec {
    pub source: NodeId,
    pub edge_type: EdgeType,
    pub target: NodeId,
    pub properties: PropertyMap,
}

impl EdgeSpec {
    pub fn new(source: NodeId, edge_type: impl Into<EdgeType>, target: NodeId) -> Self {
        Self {
            source,
            edge_type: edge_type.into(),
            target,
            properties: PropertyMap::new(),
        }
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// In-memory graph storage
///
/// Uses hash maps for O(1) lookup:
/// - nodes: NodeId -> Node
/// - edges: EdgeId -> Edge
/// - outgoing / incoming: NodeId -> Vec<EdgeId> adjacency in creation order
/// - label_index: Label -> Vec<NodeId> in insertion order
///
/// Insertion-ordered Vecs (rather than sets) back the label index and
/// adjacency lists so "first match" and scan order are deterministic.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    outgoing: HashMap<NodeId, Vec<EdgeId>>,
    incoming: HashMap<NodeId, Vec<EdgeId>>,
    label_index: HashMap<Label, Vec<NodeId>>,
    indexes: IndexManager,

    // Monotonic, never reused while the store is alive
    next_node_id: u64,
    next_edge_id: u64,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        GraphStore {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            label_index: HashMap::new(),
            indexes: IndexManager::new(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    // ============================================================
    // Bulk mutation
    // ============================================================

    /// Bulk-create nodes, returning handles in input order
    ///
    /// The whole batch is validated before anything is allocated, so a
    /// malformed spec fails the call without leaving partial state behind.
    pub fn create_nodes(&mut self, specs: Vec<NodeSpec>) -> GraphResult<Vec<NodeId>> {
        for spec in &specs {
            validate_labels(&spec.labels)?;
            validate_properties(&spec.properties)?;
        }

        let mut ids = Vec::with_capacity(specs.len());
        for spec in specs {
            let id = NodeId::new(self.next_node_id);
            self.next_node_id += 1;

            for label in &spec.labels {
                let bucket = self.label_index.entry(label.clone()).or_default();
                if !bucket.contains(&id) {
                    bucket.push(id);
                }
                for (key, value) in &spec.properties {
                    self.indexes.index_insert(label, key, value, id);
                }
            }

            let node = Node::new(id, spec.labels, spec.properties);
            self.nodes.insert(id, node);
            self.outgoing.insert(id, Vec::new());
            self.incoming.insert(id, Vec::new());
            ids.push(id);
        }

        debug!(count = ids.len(), "created nodes");
        Ok(ids)
    }

    /// Bulk-create edges between existing nodes, returning handles in input order
    ///
    /// Fails with `DanglingReference` if any endpoint in the batch is
    /// unknown; in that case no edge from the batch is created.
    pub fn create_edges(&mut self, specs: Vec<EdgeSpec>) -> GraphResult<Vec<EdgeId>> {
        for spec in &specs {
            if spec.edge_type.is_empty() {
                return Err(GraphError::Validation("empty edge type".to_string()));
            }
            if !self.nodes.contains_key(&spec.source) {
                return Err(GraphError::DanglingReference(spec.source));
            }
            if !self.nodes.contains_key(&spec.target) {
                return Err(GraphError::DanglingReference(spec.target));
            }
            validate_properties(&spec.properties)?;
        }

        let mut ids = Vec::with_capacity(specs.len());
        for spec in specs {
            let id = EdgeId::new(self.next_edge_id);
            self.next_edge_id += 1;

            self.outgoing.entry(spec.source).or_default().push(id);
            self.incoming.entry(spec.target).or_default().push(id);

            let edge = Edge::new(id, spec.source, spec.target, spec.edge_type, spec.properties);
            self.edges.insert(id, edge);
            ids.push(id);
        }

        debug!(count = ids.len(), "created edges");
        Ok(ids)
    }

    // ============================================================
    // Point access
    // ============================================================

    /// Get a node by handle, failing with `NodeNotFound` if absent
    pub fn get_node(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Get a node by handle, `None` if absent
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get an edge by handle, failing with `EdgeNotFound` if absent
    pub fn get_edge(&self, id: EdgeId) -> GraphResult<&Edge> {
        self.edges.get(&id).ok_or(GraphError::EdgeNotFound(id))
    }

    /// Get an edge by handle, `None` if absent
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    // ============================================================
    // Incremental mutation
    // ============================================================

    /// Set a property on a node, keeping property indexes synchronous
    pub fn set_node_property(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let key = key.into();
        let value = value.into();
        if key.is_empty() {
            return Err(GraphError::Validation("empty property key".to_string()));
        }
        if !value.is_well_formed() {
            return Err(GraphError::Validation(format!(
                "non-finite float for property {:?}",
                key
            )));
        }

        let labels: Vec<Label> = {
            let node = self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))?;
            node.labels.iter().cloned().collect()
        };

        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        let old = node.set_property(key.clone(), value.clone());

        for label in &labels {
            if let Some(old_value) = &old {
                self.indexes.index_remove(label, &key, old_value, id);
            }
            self.indexes.index_insert(label, &key, &value, id);
        }

        Ok(old)
    }

    /// Add a label to an existing node, updating the label and property indexes
    pub fn add_label(&mut self, id: NodeId, label: impl Into<Label>) -> GraphResult<()> {
        let label = label.into();
        if label.is_empty() {
            return Err(GraphError::Validation("empty label".to_string()));
        }

        let properties = {
            let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
            node.add_label(label.clone());
            node.properties.clone()
        };

        let bucket = self.label_index.entry(label.clone()).or_default();
        if !bucket.contains(&id) {
            bucket.push(id);
        }
        for (key, value) in &properties {
            self.indexes.index_insert(&label, key, value, id);
        }

        Ok(())
    }

    /// Delete a node, cascading to all incident edges
    ///
    /// The node and its incident edges disappear in the same call; with the
    /// writer holding exclusive access no reader can observe the partial
    /// state in between.
    pub fn delete_node(&mut self, id: NodeId) -> GraphResult<Node> {
        let node = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;

        // Cascade: remove every incident edge. A self-loop appears in both
        // adjacency lists, hence the dedup via second-removal tolerance.
        let mut incident: Vec<EdgeId> = self.outgoing.remove(&id).unwrap_or_default();
        incident.extend(self.incoming.remove(&id).unwrap_or_default());
        for edge_id in incident {
            if let Some(edge) = self.edges.remove(&edge_id) {
                if let Some(adj) = self.outgoing.get_mut(&edge.source) {
                    adj.retain(|&eid| eid != edge_id);
                }
                if let Some(adj) = self.incoming.get_mut(&edge.target) {
                    adj.retain(|&eid| eid != edge_id);
                }
            }
        }

        for label in &node.labels {
            if let Some(bucket) = self.label_index.get_mut(label) {
                bucket.retain(|&nid| nid != id);
            }
            for (key, value) in &node.properties {
                self.indexes.index_remove(label, key, value, id);
            }
        }

        debug!(node = %id, "deleted node with incident edges");
        Ok(node)
    }

    /// Delete a single edge
    pub fn delete_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self.edges.remove(&id).ok_or(GraphError::EdgeNotFound(id))?;

        if let Some(adj) = self.outgoing.get_mut(&edge.source) {
            adj.retain(|&eid| eid != id);
        }
        if let Some(adj) = self.incoming.get_mut(&edge.target) {
            adj.retain(|&eid| eid != id);
        }

        Ok(edge)
    }

    // ============================================================
    // Traversal
    // ============================================================

    /// Edges whose start node is `node`, in creation order
    ///
    /// Each call yields a fresh iterator; an unknown handle yields an empty
    /// sequence rather than an error.
    pub fn outgoing<'a>(
        &'a self,
        node: NodeId,
        edge_type: Option<&'a EdgeType>,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.outgoing
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.edges.get(id))
            .filter(move |edge| edge_type.map_or(true, |t| &edge.edge_type == t))
    }

    /// Edges whose end node is `node`, in creation order
    pub fn incoming<'a>(
        &'a self,
        node: NodeId,
        edge_type: Option<&'a EdgeType>,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.incoming
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.edges.get(id))
            .filter(move |edge| edge_type.map_or(true, |t| &edge.edge_type == t))
    }

    /// All nodes, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All nodes carrying `label`, in insertion order
    ///
    /// Full-scan fallback for lookups with no registered index.
    pub fn nodes_with_label<'a>(&'a self, label: &Label) -> impl Iterator<Item = &'a Node> + 'a {
        self.label_index
            .get(label)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.nodes.get(id))
    }

    // ============================================================
    // Property indexes
    // ============================================================

    /// Register a (label, property) index; repeated registration is a no-op
    ///
    /// Registering after data already exists backfills the index from a
    /// label scan so index lookups and full scans always agree.
    pub fn register_index(&mut self, label: impl Into<Label>, key: impl Into<String>) {
        let label = label.into();
        let key = key.into();
        if self.indexes.is_registered(&label, &key) {
            return;
        }

        let mut entries = Vec::new();
        for id in self.label_index.get(&label).into_iter().flatten() {
            if let Some(node) = self.nodes.get(id) {
                if let Some(value) = node.property(&key) {
                    entries.push((value.clone(), *id));
                }
            }
        }

        self.indexes.register(label.clone(), key.clone());
        for (value, id) in entries {
            self.indexes.index_insert(&label, &key, &value, id);
        }
        debug!(label = %label, key = %key, "registered property index");
    }

    /// Indexed point lookup: node handles whose `key` equals `value`, in
    /// insertion order; `None` if no index is registered for (label, key)
    pub fn lookup(&self, label: &Label, key: &str, value: &PropertyValue) -> Option<Vec<NodeId>> {
        self.indexes.lookup(label, key, value)
    }

    /// Access to the index manager
    pub fn indexes(&self) -> &IndexManager {
        &self.indexes
    }

    // ============================================================
    // Introspection
    // ============================================================

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Clear all data; handle counters keep advancing
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.outgoing.clear();
        self.incoming.clear();
        self.label_index.clear();
        self.indexes.clear();
    }
}

fn validate_labels(labels: &[Label]) -> GraphResult<()> {
    for label in labels {
        if label.is_empty() {
            return Err(GraphError::Validation("empty label".to_string()));
        }
    }
    Ok(())
}

fn validate_properties(properties: &PropertyMap) -> GraphResult<()> {
    for (key, value) in properties {
        if key.is_empty() {
            return Err(GraphError::Validation("empty property key".to_string()));
        }
        if !value.is_well_formed() {
            return Err(GraphError::Validation(format!(
                "non-finite float for property {:?}",
                key
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, username: &str) -> NodeSpec {
        NodeSpec::new()
            .label("user")
            .property("name", name)
            .property("username", username)
    }

    #[test]
    fn test_create_and_get_nodes() {
        let mut store = GraphStore::new();
        let ids = store
            .create_nodes(vec![user("Brad Bob", "bradbob"), user("Zoe Zeb", "zoezeb")])
            .unwrap();

        assert_eq!(store.node_count(), 2);
        assert_eq!(ids.len(), 2);
        assert!(ids[0] < ids[1]);

        let node = store.get_node(ids[0]).unwrap();
        assert!(node.has_label(&Label::new("user")));
        assert_eq!(node.string_property("name"), Some("Brad Bob"));
    }

    #[test]
    fn test_create_nodes_validation() {
        let mut store = GraphStore::new();
        let bad = NodeSpec::new().label("user").property("score", f64::NAN);
        let result = store.create_nodes(vec![user("ok", "ok"), bad]);

        assert!(matches!(result, Err(GraphError::Validation(_))));
        // Batch is all-or-nothing
        assert_eq!(store.node_count(), 0);
    }

    #[test]
    fn test_create_edges() {
        let mut store = GraphStore::new();
        let ids = store
            .create_nodes(vec![user("a", "a"), NodeSpec::new().label("project").property("name", "x")])
            .unwrap();

        let edges = store
            .create_edges(vec![EdgeSpec::new(ids[1], "OWNED_BY", ids[0])])
            .unwrap();

        let edge = store.get_edge(edges[0]).unwrap();
        assert_eq!(edge.source, ids[1]);
        assert_eq!(edge.target, ids[0]);
        assert_eq!(edge.edge_type, EdgeType::new("OWNED_BY"));
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let mut store = GraphStore::new();
        let ids = store.create_nodes(vec![user("a", "a")]).unwrap();
        let ghost = NodeId::new(999);

        let result = store.create_edges(vec![EdgeSpec::new(ids[0], "KNOWS", ghost)]);
        assert_eq!(result, Err(GraphError::DanglingReference(ghost)));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_traversal_order_and_filter() {
        let mut store = GraphStore::new();
        let ids = store
            .create_nodes(vec![user("a", "a"), user("b", "b"), user("c", "c")])
            .unwrap();
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        store
            .create_edges(vec![
                EdgeSpec::new(a, "KNOWS", b),
                EdgeSpec::new(a, "FOLLOWS", c),
                EdgeSpec::new(a, "KNOWS", c),
            ])
            .unwrap();

        let all: Vec<_> = store.outgoing(a, None).map(|e| e.target).collect();
        assert_eq!(all, vec![b, c, c]);

        let knows = EdgeType::new("KNOWS");
        let filtered: Vec<_> = store.outgoing(a, Some(&knows)).map(|e| e.target).collect();
        assert_eq!(filtered, vec![b, c]);

        let incoming_c: Vec<_> = store.incoming(c, None).map(|e| e.source).collect();
        assert_eq!(incoming_c, vec![a, a]);
    }

    #[test]
    fn test_cascade_delete() {
        let mut store = GraphStore::new();
        let ids = store
            .create_nodes(vec![user("a", "a"), user("b", "b")])
            .unwrap();
        store
            .create_edges(vec![
                EdgeSpec::new(ids[0], "KNOWS", ids[1]),
                EdgeSpec::new(ids[1], "KNOWS", ids[0]),
            ])
            .unwrap();

        store.delete_node(ids[0]).unwrap();

        assert_eq!(store.node_count(), 1);
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.outgoing(ids[1], None).count(), 0);
        assert_eq!(store.incoming(ids[1], None).count(), 0);
        assert!(matches!(
            store.get_node(ids[0]),
            Err(GraphError::NodeNotFound(id)) if id == ids[0]
        ));
    }

    #[test]
    fn test_handles_never_reused() {
        let mut store = GraphStore::new();
        let first = store.create_nodes(vec![user("a", "a")]).unwrap()[0];
        store.delete_node(first).unwrap();

        let second = store.create_nodes(vec![user("b", "b")]).unwrap()[0];
        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn test_label_scan_insertion_order() {
        let mut store = GraphStore::new();
        let ids = store
            .create_nodes(vec![user("a", "dupe"), user("b", "dupe"), user("c", "solo")])
            .unwrap();

        let scanned: Vec<_> = store
            .nodes_with_label(&Label::new("user"))
            .map(|n| n.id)
            .collect();
        assert_eq!(scanned, ids);
    }

    #[test]
    fn test_set_property_keeps_index_synchronous() {
        let mut store = GraphStore::new();
        store.register_index("user", "username");
        let ids = store.create_nodes(vec![user("a", "olda")]).unwrap();

        store.set_node_property(ids[0], "username", "newa").unwrap();

        let label = Label::new("user");
        assert_eq!(
            store.lookup(&label, "username", &"olda".into()).unwrap(),
            Vec::<NodeId>::new()
        );
        assert_eq!(
            store.lookup(&label, "username", &"newa".into()).unwrap(),
            vec![ids[0]]
        );
    }

    #[test]
    fn test_add_label_indexes_existing_properties() {
        let mut store = GraphStore::new();
        store.register_index("contributor", "username");
        let ids = store.create_nodes(vec![user("a", "a")]).unwrap();

        store.add_label(ids[0], "contributor").unwrap();

        let label = Label::new("contributor");
        assert_eq!(
            store.lookup(&label, "username", &"a".into()).unwrap(),
            vec![ids[0]]
        );
        assert_eq!(store.nodes_with_label(&label).count(), 1);
    }
}
