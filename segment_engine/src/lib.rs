//! # Catalog segment evaluation
//!
//! Executes compiled segment rules against a record store and ingests
//! upstream catalog products into it.

pub mod api;
pub mod execution;
pub mod ingest;
pub mod store;
pub mod types;

// Convenience re-exports
pub use api::{EvaluationError, EvaluatorConfig, SegmentResponse, SegmentService};
pub use execution::{EvaluationOutcome, EvaluationStats, SegmentEvaluator};
pub use ingest::{ingest_products, IngestError, IngestSummary, SourceProduct};
pub use store::{InMemoryStore, RecordStore, StoreError, UpsertOutcome};
pub use types::CatalogRecord;
