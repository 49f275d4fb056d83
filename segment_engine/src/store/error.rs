use segment_compiler::logging::codes;

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store failures; propagated to the caller, never retried
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record store lock poisoned during {operation}")]
    LockPoisoned { operation: &'static str },

    #[error("Failed to access record file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Record file '{path}' is not a valid JSON record array: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate record id {id} in '{path}'")]
    DuplicateId { id: u64, path: String },

    #[error("Record store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    pub fn lock_poisoned(operation: &'static str) -> Self {
        Self::LockPoisoned { operation }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> codes::Code {
        match self {
            Self::LockPoisoned { .. } => codes::store::STORE_LOCK_POISONED,
            Self::Io { .. }
            | Self::Json { .. }
            | Self::DuplicateId { .. }
            | Self::Unavailable { .. } => codes::store::STORE_ACCESS_FAILURE,
        }
    }
}
