//! Unweighted shortest-path search

use crate::graph::{Edge, EdgeId, EdgeType, GraphStore, NodeId};
use crate::query::Direction;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// One traversed relationship in a path, oriented as the edge is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub edge: EdgeId,
    pub edge_type: EdgeType,
    pub start: NodeId,
    pub end: NodeId,
}

impl From<&Edge> for PathSegment {
    fn from(edge: &Edge) -> Self {
        Self {
            edge: edge.id,
            edge_type: edge.edge_type.clone(),
            start: edge.source,
            end: edge.target,
        }
    }
}

/// A shortest path between two nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub source: NodeId,
    pub target: NodeId,
    /// Traversed relationships in walk order; empty for `source == target`
    pub segments: Vec<PathSegment>,
}

impl Path {
    /// Number of relationship hops
    pub fn hops(&self) -> usize {
        self.segments.len()
    }
}

/// Breadth-first shortest path from `source` to `target`
///
/// Follows edges forward for `Direction::Outgoing`, backward for
/// `Direction::Incoming`, or both ways for `Direction::Either`. Returns a
/// minimum-hop path, `None` when the nodes are disconnected or either handle
/// is unknown, and a zero-hop path when `source == target`.
///
/// When several shortest paths exist the result is deterministic: at every
/// frontier, neighbors expand lowest handle first.
pub fn shortest_path(
    store: &GraphStore,
    source: NodeId,
    target: NodeId,
    direction: Direction,
) -> Option<Path> {
    if !store.has_node(source) || !store.has_node(target) {
        return None;
    }
    if source == target {
        return Some(Path {
            source,
            target,
            segments: Vec::new(),
        });
    }

    // node -> (parent node, edge traversed to reach it)
    let mut parent: FxHashMap<NodeId, (NodeId, EdgeId)> = FxHashMap::default();
    let mut queue = VecDeque::new();
    parent.insert(source, (source, EdgeId::new(0)));
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        let mut neighbors = expand(store, current, direction);
        neighbors.sort();

        for (next, edge) in neighbors {
            if parent.contains_key(&next) {
                continue;
            }
            parent.insert(next, (current, edge));
            if next == target {
                return Some(reconstruct(store, source, target, &parent));
            }
            queue.push_back(next);
        }
    }

    None
}

fn expand(store: &GraphStore, node: NodeId, direction: Direction) -> Vec<(NodeId, EdgeId)> {
    match direction {
        Direction::Outgoing => store
            .outgoing(node, None)
            .map(|e| (e.target, e.id))
            .collect(),
        Direction::Incoming => store
            .incoming(node, None)
            .map(|e| (e.source, e.id))
            .collect(),
        Direction::Either => store
            .outgoing(node, None)
            .chain(store.incoming(node, None))
            .filter_map(|e| e.other_endpoint(node).map(|n| (n, e.id)))
            .collect(),
    }
}

fn reconstruct(
    store: &GraphStore,
    source: NodeId,
    target: NodeId,
    parent: &FxHashMap<NodeId, (NodeId, EdgeId)>,
) -> Path {
    let mut segments = Vec::new();
    let mut current = target;
    while current != source {
        let (prev, edge_id) = parent[&current];
        if let Some(edge) = store.edge(edge_id) {
            segments.push(PathSegment::from(edge));
        }
        current = prev;
    }
    segments.reverse();
    Path {
        source,
        target,
        segments,
    }
}
