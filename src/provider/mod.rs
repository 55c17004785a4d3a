pub mod memory;

use async_trait::async_trait;

use crate::core::{ReferenceEntry, ReferenceSet};
use crate::error::Result;

pub use memory::MemoryProvider;

/// Trait for candidate-pool providers (reference data is owned by the
/// seeding/admin side; the engine only reads it)
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    /// Get a reference set's metadata
    async fn get_set(&self, set_id: i64) -> Result<Option<ReferenceSet>>;

    /// Entries of a reference set, in stable sort-key order
    async fn set_entries(&self, set_id: i64) -> Result<Vec<ReferenceEntry>>;

    /// Ordered, stable pool of entries eligible for the daily game in a
    /// scope (e.g. all roster members of team X), sorted by entry id
    async fn daily_pool(&self, scope_key: &str) -> Result<Vec<ReferenceEntry>>;

    /// Look up a single entry by id
    async fn get_entry(&self, entry_id: i64) -> Result<Option<ReferenceEntry>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
