use crate::store::StoreError;
use segment_compiler::logging::codes;

/// Ingestion failures
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to decode source products: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to read source file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid source product {id}: {reason}")]
    InvalidRecord { id: u64, reason: String },

    #[error("Failed to save product: {0}")]
    Store(#[from] StoreError),
}

impl IngestError {
    pub fn invalid_record(id: u64, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            id,
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> codes::Code {
        match self {
            Self::Decode(_) | Self::Io { .. } => codes::ingest::SOURCE_DECODE_FAILURE,
            Self::InvalidRecord { .. } => codes::ingest::INVALID_SOURCE_RECORD,
            Self::Store(e) => e.error_code(),
        }
    }
}
