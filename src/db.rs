//! Shared database handle enforcing single-writer/multiple-reader access

use crate::graph::GraphStore;
use std::sync::RwLock;

/// A process-wide graph database handle
///
/// Structural mutations run under the exclusive write lock for their whole
/// (bulk) duration; queries share the read lock and observe a consistent
/// snapshot. No lock is ever held across calls, so deletions become visible
/// atomically and never partially.
#[derive(Debug, Default)]
pub struct GraphDb {
    store: RwLock<GraphStore>,
}

impl GraphDb {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(GraphStore::new()),
        }
    }

    /// Run a read-only operation under the shared lock
    pub fn read<T>(&self, f: impl FnOnce(&GraphStore) -> T) -> T {
        let guard = self.store.read().unwrap();
        f(&guard)
    }

    /// Run a mutation under the exclusive lock
    pub fn write<T>(&self, f: impl FnOnce(&mut GraphStore) -> T) -> T {
        let mut guard = self.store.write().unwrap();
        f(&mut guard)
    }
}
