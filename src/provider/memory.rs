use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::core::{ReferenceEntry, ReferenceSet};
use crate::error::Result;
use crate::provider::CandidateProvider;

/// In-memory candidate provider, seeded up front.
///
/// Backs tests and the demo CLI; a production deployment wires the engine to
/// the platform's own reference tables instead.
pub struct MemoryProvider {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    sets: HashMap<i64, ReferenceSet>,
    entries: HashMap<i64, ReferenceEntry>,
    /// scope key -> entry ids eligible for the daily game
    scopes: HashMap<String, Vec<i64>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Seed a set and its entries. Entries keep their declared order as the
    /// roster order; lookups stay sorted by sort key.
    pub fn seed_set(&self, set: ReferenceSet, entries: Vec<ReferenceEntry>) {
        let mut inner = self.inner.write().unwrap();
        inner.sets.insert(set.id, set);
        for entry in entries {
            inner.entries.insert(entry.id, entry);
        }
    }

    /// Declare the daily-game pool for a scope key. Ids are stored sorted so
    /// the pool order is stable regardless of declaration order.
    pub fn seed_scope(&self, scope_key: impl Into<String>, mut entry_ids: Vec<i64>) {
        entry_ids.sort_unstable();
        self.inner
            .write()
            .unwrap()
            .scopes
            .insert(scope_key.into(), entry_ids);
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CandidateProvider for MemoryProvider {
    async fn get_set(&self, set_id: i64) -> Result<Option<ReferenceSet>> {
        Ok(self.inner.read().unwrap().sets.get(&set_id).cloned())
    }

    async fn set_entries(&self, set_id: i64) -> Result<Vec<ReferenceEntry>> {
        let inner = self.inner.read().unwrap();
        let mut entries: Vec<ReferenceEntry> = inner
            .entries
            .values()
            .filter(|e| e.set_id == set_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.sort_key, e.id));
        Ok(entries)
    }

    async fn daily_pool(&self, scope_key: &str) -> Result<Vec<ReferenceEntry>> {
        let inner = self.inner.read().unwrap();
        let ids = inner.scopes.get(scope_key).cloned().unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| inner.entries.get(id).cloned())
            .collect())
    }

    async fn get_entry(&self, entry_id: i64) -> Result<Option<ReferenceEntry>> {
        Ok(self.inner.read().unwrap().entries.get(&entry_id).cloned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
