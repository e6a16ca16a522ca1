//! Pattern specifications for declarative graph matching
//!
//! A pattern is a fixed-shape directed chain of node constraints joined by
//! relationship steps. Patterns are plain data built with these types, not
//! query strings, so they compose and test in isolation.

use crate::graph::{EdgeType, Label, NodeId, PropertyValue};

/// Traversal direction for a relationship step or a path search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow the edge from its start to its end node
    Outgoing,
    /// Follow the edge against its declared direction
    Incoming,
    /// Follow edges regardless of direction
    Either,
}

/// Constraint on one node position in a pattern
///
/// A position is either free (bound during matching) or anchored to a
/// caller-supplied concrete handle.
#[derive(Debug, Clone)]
pub struct NodeConstraint {
    /// Variable name this position binds to
    pub var: String,
    /// Required label, if any
    pub label: Option<Label>,
    /// Property equality filters
    pub props: Vec<(String, PropertyValue)>,
    /// Pre-bound concrete handle, if any
    pub anchor: Option<NodeId>,
}

impl NodeConstraint {
    /// A free position bound to `var`
    pub fn var(name: impl Into<String>) -> Self {
        Self {
            var: name.into(),
            label: None,
            props: Vec::new(),
            anchor: None,
        }
    }

    /// Require a label
    pub fn label(mut self, label: impl Into<Label>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Require a property to equal a value
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.props.push((key.into(), value.into()));
        self
    }

    /// Anchor this position to a concrete node handle
    pub fn anchor(mut self, node: NodeId) -> Self {
        self.anchor = Some(node);
        self
    }
}

/// One relationship step between two node positions
#[derive(Debug, Clone)]
pub struct RelStep {
    /// Variable the traversed edge binds to, if named
    pub var: Option<String>,
    /// Required edge type, if any
    pub edge_type: Option<EdgeType>,
    /// Declared direction, read from the earlier position toward the later one
    pub direction: Direction,
}

impl RelStep {
    /// Typed step from the current position to the next: `(cur)-[TYPE]->(next)`
    pub fn outgoing(edge_type: impl Into<EdgeType>) -> Self {
        Self {
            var: None,
            edge_type: Some(edge_type.into()),
            direction: Direction::Outgoing,
        }
    }

    /// Typed step from the next position to the current: `(cur)<-[TYPE]-(next)`
    pub fn incoming(edge_type: impl Into<EdgeType>) -> Self {
        Self {
            var: None,
            edge_type: Some(edge_type.into()),
            direction: Direction::Incoming,
        }
    }

    /// Typed step in either direction
    pub fn either(edge_type: impl Into<EdgeType>) -> Self {
        Self {
            var: None,
            edge_type: Some(edge_type.into()),
            direction: Direction::Either,
        }
    }

    /// Untyped step in the given direction
    pub fn any(direction: Direction) -> Self {
        Self {
            var: None,
            edge_type: None,
            direction,
        }
    }

    /// Name the traversed edge so it appears in binding sets
    pub fn var(mut self, name: impl Into<String>) -> Self {
        self.var = Some(name.into());
        self
    }
}

/// A directed chain of node constraints joined by relationship steps
#[derive(Debug, Clone)]
pub struct Pattern {
    pub start: NodeConstraint,
    pub steps: Vec<(RelStep, NodeConstraint)>,
}

impl Pattern {
    /// Start a pattern at a node constraint
    pub fn node(start: NodeConstraint) -> Self {
        Self {
            start,
            steps: Vec::new(),
        }
    }

    /// Extend the chain by one relationship step and node constraint
    pub fn step(mut self, rel: RelStep, node: NodeConstraint) -> Self {
        self.steps.push((rel, node));
        self
    }

    /// Number of node positions in the chain
    pub fn node_count(&self) -> usize {
        self.steps.len() + 1
    }

    /// Constraint at node position `pos` (0 = start)
    pub fn constraint(&self, pos: usize) -> &NodeConstraint {
        if pos == 0 {
            &self.start
        } else {
            &self.steps[pos - 1].1
        }
    }
}
