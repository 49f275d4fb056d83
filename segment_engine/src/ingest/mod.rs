//! Catalog ingestion: upstream products are mapped and upserted by id
//!
//! Fetching from the upstream API is out of scope; callers hand over the
//! decoded product listing (one page or several).

pub mod error;
pub mod mapping;
pub mod source;

pub use error::IngestError;
pub use mapping::map_product;
pub use source::{decode_products, NamedRef, SourceProduct};

use crate::store::{RecordStore, UpsertOutcome};
use chrono::{DateTime, Utc};
use segment_compiler::logging::codes;
use serde::Serialize;
use std::path::Path;

/// Counts reported after an ingestion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub fetched: usize,
    pub total_saved: usize,
    pub inserted: usize,
    pub updated: usize,
    pub completed_at: DateTime<Utc>,
}

/// Map and upsert every product; the first failure stops the run
pub fn ingest_products(
    store: &dyn RecordStore,
    products: &[SourceProduct],
) -> Result<IngestSummary, IngestError> {
    let mut inserted = 0;
    let mut updated = 0;

    for product in products {
        let record = map_product(product).map_err(|error| {
            segment_compiler::log_error!(error.error_code(), "Source product rejected",
                "id" => product.id,
                "error" => &error
            );
            error
        })?;

        match store.upsert(record)? {
            UpsertOutcome::Inserted => inserted += 1,
            UpsertOutcome::Updated => updated += 1,
        }
    }

    let summary = IngestSummary {
        fetched: products.len(),
        total_saved: inserted + updated,
        inserted,
        updated,
        completed_at: Utc::now(),
    };

    segment_compiler::log_success!(codes::success::INGESTION_COMPLETE, "Catalog ingestion complete",
        "fetched" => summary.fetched,
        "inserted" => summary.inserted,
        "updated" => summary.updated
    );

    Ok(summary)
}

/// Decode a source file and ingest its products
pub fn ingest_file(
    store: &dyn RecordStore,
    path: impl AsRef<Path>,
) -> Result<IngestSummary, IngestError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let products = decode_products(&content)?;
    ingest_products(store, &products)
}
