//! Post-processing of matcher output: grouping, counting, ordering, limiting
//!
//! Each operation composes independently; with no grouping the aggregator is
//! a pure sort+limit pass over ungrouped binding sets.

use super::binding::{Binding, BindingSet};
use crate::graph::{GraphStore, NodeId, PropertyValue};
use rustc_hash::{FxHashMap, FxHashSet};

/// Sort direction for an ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A group key and its distinct-count
pub type CountedRow = (NodeId, usize);

/// Groups, counts, sorts and truncates binding sets
pub struct Aggregator<'a> {
    store: &'a GraphStore,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self { store }
    }

    /// Group by the node bound to `group_var`, counting distinct bindings of
    /// `count_var` per group
    ///
    /// Groups come out in first-seen order; sets missing either variable are
    /// skipped.
    pub fn group_count(
        &self,
        sets: &[BindingSet],
        group_var: &str,
        count_var: &str,
    ) -> Vec<CountedRow> {
        let mut order: Vec<NodeId> = Vec::new();
        let mut groups: FxHashMap<NodeId, FxHashSet<Binding>> = FxHashMap::default();

        for set in sets {
            let (Some(group), Some(counted)) = (set.node(group_var), set.get(count_var)) else {
                continue;
            };
            if !groups.contains_key(&group) {
                order.push(group);
            }
            groups.entry(group).or_default().insert(*counted);
        }

        order
            .into_iter()
            .map(|id| {
                let count = groups.get(&id).map_or(0, FxHashSet::len);
                (id, count)
            })
            .collect()
    }

    /// Sort counted rows by descending count, tie-broken by the named node
    /// property ascending, then by handle ascending
    ///
    /// The property tie-break keeps equal-count orderings stable across runs
    /// (ties are common in this domain).
    pub fn sort_counted_desc(&self, rows: &mut [CountedRow], tie_prop: &str) {
        rows.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| self.node_prop(a.0, tie_prop).cmp(&self.node_prop(b.0, tie_prop)))
                .then_with(|| a.0.cmp(&b.0))
        });
    }

    /// Stable sort of binding sets by a property of the node bound to `var`,
    /// with ascending handle as the secondary tie-break
    pub fn sort_by_property(
        &self,
        sets: &mut [BindingSet],
        var: &str,
        key: &str,
        order: SortOrder,
    ) {
        sets.sort_by(|a, b| {
            let (an, bn) = (a.node(var), b.node(var));
            let av = an.map_or(PropertyValue::Null, |id| self.node_prop(id, key));
            let bv = bn.map_or(PropertyValue::Null, |id| self.node_prop(id, key));
            let primary = match order {
                SortOrder::Ascending => av.cmp(&bv),
                SortOrder::Descending => bv.cmp(&av),
            };
            primary.then_with(|| an.cmp(&bn))
        });
    }

    /// Truncate to at most `limit` rows; `None` keeps everything
    pub fn limit<T>(rows: &mut Vec<T>, limit: Option<usize>) {
        if let Some(n) = limit {
            rows.truncate(n);
        }
    }

    fn node_prop(&self, id: NodeId, key: &str) -> PropertyValue {
        self.store
            .node(id)
            .and_then(|n| n.property(key).cloned())
            .unwrap_or(PropertyValue::Null)
    }
}
