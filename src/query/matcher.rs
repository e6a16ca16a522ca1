//! Pattern evaluation against the graph store
//!
//! The matcher seeds from the most selective position of a pattern (anchor,
//! then indexed property lookup, then label scan), walks the chain outward
//! in both directions, and emits one binding set per satisfying walk.

use super::binding::{Binding, BindingSet};
use super::pattern::{Direction, NodeConstraint, Pattern, RelStep};
use crate::graph::{EdgeId, GraphStore, NodeId};
use rustc_hash::FxHashSet;
use tracing::trace;

/// Evaluates patterns against a store snapshot
pub struct Matcher<'a> {
    store: &'a GraphStore,
}

impl<'a> Matcher<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self { store }
    }

    /// All binding sets satisfying `pattern`, in deterministic order
    ///
    /// An unsatisfiable constraint yields an empty result, never an error.
    pub fn matches(&self, pattern: &Pattern) -> Vec<BindingSet> {
        let seed_pos = self.pick_seed(pattern);
        let seeds = self.seed_candidates(pattern.constraint(seed_pos));
        trace!(
            seed_var = %pattern.constraint(seed_pos).var,
            candidates = seeds.len(),
            "matching pattern"
        );

        let mut results = Vec::new();
        for seed in seeds {
            if !self.satisfies(seed, pattern.constraint(seed_pos)) {
                continue;
            }
            let mut base = BindingSet::new();
            base.bind(pattern.constraint(seed_pos).var.clone(), Binding::Node(seed));

            for right in self.expand_right(pattern, seed_pos, seed, &base) {
                results.extend(self.expand_left(pattern, seed_pos, seed, &right));
            }
        }
        results
    }

    /// Nested-loop equality join of two binding-set collections on a shared
    /// node variable
    pub fn join(&self, left: &[BindingSet], right: &[BindingSet], var: &str) -> Vec<BindingSet> {
        let mut out = Vec::new();
        for l in left {
            let Some(lv) = l.get(var) else { continue };
            for r in right {
                if r.get(var) == Some(lv) {
                    let mut merged = l.clone();
                    merged.merge(r);
                    out.push(merged);
                }
            }
        }
        out
    }

    // Seed selection: anchor beats indexed lookup beats label scan beats a
    // full-store scan. Earliest position wins ties.
    fn pick_seed(&self, pattern: &Pattern) -> usize {
        let mut best = (usize::MAX, 0usize);
        for pos in 0..pattern.node_count() {
            let c = pattern.constraint(pos);
            let score = if c.anchor.is_some() {
                0
            } else if self.has_indexed_prop(c) {
                1
            } else if c.label.is_some() {
                2
            } else {
                3
            };
            if score < best.0 {
                best = (score, pos);
            }
        }
        best.1
    }

    fn has_indexed_prop(&self, c: &NodeConstraint) -> bool {
        match &c.label {
            Some(label) => c
                .props
                .iter()
                .any(|(key, _)| self.store.indexes().is_registered(label, key)),
            None => false,
        }
    }

    fn seed_candidates(&self, c: &NodeConstraint) -> Vec<NodeId> {
        if let Some(anchor) = c.anchor {
            return vec![anchor];
        }
        if let Some(label) = &c.label {
            for (key, value) in &c.props {
                if let Some(ids) = self.store.lookup(label, key, value) {
                    return ids;
                }
            }
            return self.store.nodes_with_label(label).map(|n| n.id).collect();
        }
        // No label, no anchor: full scan, sorted for determinism
        let mut ids: Vec<NodeId> = self.store.nodes().map(|n| n.id).collect();
        ids.sort();
        ids
    }

    fn satisfies(&self, id: NodeId, c: &NodeConstraint) -> bool {
        if let Some(anchor) = c.anchor {
            if anchor != id {
                return false;
            }
        }
        let Some(node) = self.store.node(id) else {
            return false;
        };
        if let Some(label) = &c.label {
            if !node.has_label(label) {
                return false;
            }
        }
        c.props
            .iter()
            .all(|(key, value)| node.property(key) == Some(value))
    }

    // Walk from position `pos` toward the end of the chain.
    fn expand_right(
        &self,
        pattern: &Pattern,
        pos: usize,
        node: NodeId,
        set: &BindingSet,
    ) -> Vec<BindingSet> {
        if pos + 1 >= pattern.node_count() {
            return vec![set.clone()];
        }
        let (step, next_constraint) = &pattern.steps[pos];

        let mut results = Vec::new();
        for (edge, next) in self.step_neighbors(node, step, true) {
            if !self.satisfies(next, next_constraint) {
                continue;
            }
            let mut extended = set.clone();
            if let Some(var) = &step.var {
                extended.bind(var.clone(), Binding::Edge(edge));
            }
            extended.bind(next_constraint.var.clone(), Binding::Node(next));
            results.extend(self.expand_right(pattern, pos + 1, next, &extended));
        }
        results
    }

    // Walk from position `pos` back toward the start of the chain.
    fn expand_left(
        &self,
        pattern: &Pattern,
        pos: usize,
        node: NodeId,
        set: &BindingSet,
    ) -> Vec<BindingSet> {
        if pos == 0 {
            return vec![set.clone()];
        }
        let (step, _) = &pattern.steps[pos - 1];
        let prev_constraint = pattern.constraint(pos - 1);

        let mut results = Vec::new();
        for (edge, prev) in self.step_neighbors(node, step, false) {
            if !self.satisfies(prev, prev_constraint) {
                continue;
            }
            let mut extended = set.clone();
            if let Some(var) = &step.var {
                extended.bind(var.clone(), Binding::Edge(edge));
            }
            extended.bind(prev_constraint.var.clone(), Binding::Node(prev));
            results.extend(self.expand_left(pattern, pos - 1, prev, &extended));
        }
        results
    }

    // Neighbors reachable from `node` across `step`. `forward` is true when
    // walking from the earlier position toward the later one; walking back
    // flips the declared direction.
    fn step_neighbors(
        &self,
        node: NodeId,
        step: &RelStep,
        forward: bool,
    ) -> Vec<(EdgeId, NodeId)> {
        let direction = match (step.direction, forward) {
            (Direction::Outgoing, true) | (Direction::Incoming, false) => Direction::Outgoing,
            (Direction::Incoming, true) | (Direction::Outgoing, false) => Direction::Incoming,
            (Direction::Either, _) => Direction::Either,
        };
        let edge_type = step.edge_type.as_ref();

        match direction {
            Direction::Outgoing => self
                .store
                .outgoing(node, edge_type)
                .map(|e| (e.id, e.target))
                .collect(),
            Direction::Incoming => self
                .store
                .incoming(node, edge_type)
                .map(|e| (e.id, e.source))
                .collect(),
            Direction::Either => self
                .store
                .outgoing(node, edge_type)
                .chain(self.store.incoming(node, edge_type))
                .filter_map(|e| e.other_endpoint(node).map(|n| (e.id, n)))
                .collect(),
        }
    }
}

/// Drop duplicate binding sets, keeping first occurrences (DISTINCT semantics)
pub fn distinct(sets: Vec<BindingSet>) -> Vec<BindingSet> {
    let mut seen: FxHashSet<Vec<(String, Binding)>> = FxHashSet::default();
    sets.into_iter()
        .filter(|set| seen.insert(set.fingerprint()))
        .collect()
}

/// Drop binding sets where two named variables resolve to the same handle
///
/// Sets where either variable is unbound are kept.
pub fn exclude_equal(sets: Vec<BindingSet>, a: &str, b: &str) -> Vec<BindingSet> {
    sets.into_iter()
        .filter(|set| match (set.get(a), set.get(b)) {
            (Some(x), Some(y)) => x != y,
            _ => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeSpec, NodeSpec};

    fn small_graph() -> (GraphStore, Vec<NodeId>) {
        let mut store = GraphStore::new();
        let ids = store
            .create_nodes(vec![
                NodeSpec::new()
                    .label("user")
                    .property("name", "Brad")
                    .property("username", "brad"),
                NodeSpec::new()
                    .label("user")
                    .property("name", "Zoe")
                    .property("username", "zoe"),
                NodeSpec::new().label("project").property("name", "flaming-aardvark"),
            ])
            .unwrap();

        store
            .create_edges(vec![
                EdgeSpec::new(ids[2], "OWNED_BY", ids[0]),
                EdgeSpec::new(ids[0], "CONTRIBUTES_TO", ids[2]),
                EdgeSpec::new(ids[1], "CONTRIBUTES_TO", ids[2]),
            ])
            .unwrap();
        (store, ids)
    }

    #[test]
    fn test_single_node_pattern() {
        let (store, ids) = small_graph();
        let matcher = Matcher::new(&store);

        let pattern = Pattern::node(
            NodeConstraint::var("n").label("user").prop("username", "zoe"),
        );
        let sets = matcher.matches(&pattern);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].node("n"), Some(ids[1]));
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let (store, _) = small_graph();
        let matcher = Matcher::new(&store);

        let pattern = Pattern::node(
            NodeConstraint::var("n").label("user").prop("username", "nobody"),
        );
        assert!(matcher.matches(&pattern).is_empty());
    }

    #[test]
    fn test_chain_with_anchor() {
        let (store, ids) = small_graph();
        let matcher = Matcher::new(&store);

        // (p:project)-[:OWNED_BY]->(u anchored to brad)
        let pattern = Pattern::node(NodeConstraint::var("p").label("project")).step(
            RelStep::outgoing("OWNED_BY"),
            NodeConstraint::var("u").anchor(ids[0]),
        );
        let sets = matcher.matches(&pattern);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].node("p"), Some(ids[2]));
        assert_eq!(sets[0].node("u"), Some(ids[0]));
    }

    #[test]
    fn test_incoming_step_and_edge_binding() {
        let (store, ids) = small_graph();
        let matcher = Matcher::new(&store);

        // (p anchored)<-[r:CONTRIBUTES_TO]-(u:user)
        let pattern = Pattern::node(NodeConstraint::var("p").anchor(ids[2])).step(
            RelStep::incoming("CONTRIBUTES_TO").var("r"),
            NodeConstraint::var("u").label("user"),
        );
        let sets = matcher.matches(&pattern);
        assert_eq!(sets.len(), 2);
        let users: Vec<_> = sets.iter().filter_map(|s| s.node("u")).collect();
        assert_eq!(users, vec![ids[0], ids[1]]);
        assert!(sets.iter().all(|s| s.edge("r").is_some()));
    }

    #[test]
    fn test_join_consistency() {
        let (store, ids) = small_graph();
        let matcher = Matcher::new(&store);

        // Chained evaluation of (u)-[:CONTRIBUTES_TO]->(p)-[:OWNED_BY]->(o)
        let chained = Pattern::node(NodeConstraint::var("u").label("user"))
            .step(
                RelStep::outgoing("CONTRIBUTES_TO"),
                NodeConstraint::var("p").label("project"),
            )
            .step(RelStep::outgoing("OWNED_BY"), NodeConstraint::var("o").label("user"));
        let chained_sets = matcher.matches(&chained);

        // Same result from two patterns joined on p
        let left = matcher.matches(&Pattern::node(NodeConstraint::var("u").label("user")).step(
            RelStep::outgoing("CONTRIBUTES_TO"),
            NodeConstraint::var("p").label("project"),
        ));
        let right = matcher.matches(&Pattern::node(NodeConstraint::var("p").label("project")).step(
            RelStep::outgoing("OWNED_BY"),
            NodeConstraint::var("o").label("user"),
        ));
        let joined = matcher.join(&left, &right, "p");

        let mut a: Vec<_> = chained_sets.iter().map(BindingSet::fingerprint).collect();
        let mut b: Vec<_> = joined.iter().map(BindingSet::fingerprint).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        let _ = ids;
    }

    #[test]
    fn test_exclude_equal() {
        let (store, ids) = small_graph();
        let matcher = Matcher::new(&store);

        // Brad both owns and contributes to the project; excluding u = o
        // keeps only Zoe's walk.
        let pattern = Pattern::node(NodeConstraint::var("u").label("user"))
            .step(
                RelStep::outgoing("CONTRIBUTES_TO"),
                NodeConstraint::var("p").label("project"),
            )
            .step(RelStep::outgoing("OWNED_BY"), NodeConstraint::var("o").label("user"));
        let sets = exclude_equal(matcher.matches(&pattern), "u", "o");
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].node("u"), Some(ids[1]));
    }

    #[test]
    fn test_distinct() {
        let mut a = BindingSet::new();
        a.bind("u", Binding::Node(NodeId::new(1)));
        let b = a.clone();
        let mut c = BindingSet::new();
        c.bind("u", Binding::Node(NodeId::new(2)));

        let deduped = distinct(vec![a, b, c]);
        assert_eq!(deduped.len(), 2);
    }
}
