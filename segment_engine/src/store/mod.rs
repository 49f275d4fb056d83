//! Record store collaborator
//!
//! The evaluator only needs one query primitive ([`RecordStore::find`]);
//! ingestion additionally upserts by id.

pub mod error;
pub mod matching;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;

use crate::types::CatalogRecord;
use segment_compiler::compiler::StoreQuery;
use serde::{Deserialize, Serialize};

/// Whether an upsert created a new record or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Storage backend able to execute compiled store queries
pub trait RecordStore: Send + Sync {
    /// All records satisfying every clause, in the store's natural order
    fn find(&self, query: &StoreQuery) -> StoreResult<Vec<CatalogRecord>>;

    /// Insert or replace the record with the same id
    fn upsert(&self, record: CatalogRecord) -> StoreResult<UpsertOutcome>;

    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn all(&self) -> StoreResult<Vec<CatalogRecord>> {
        self.find(&StoreQuery::match_all())
    }
}
