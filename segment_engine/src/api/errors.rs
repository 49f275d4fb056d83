//! # Evaluation Errors

use crate::store::StoreError;
use segment_compiler::logging::codes;
use segment_compiler::pipeline::PipelineError;

/// Error returned by a segment evaluation request
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// Rule text was empty, malformed or rejected by the field policy
    #[error("Invalid segment rules: {0}")]
    Rules(#[from] PipelineError),

    /// Store query failed; propagated without retry
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),
}

impl EvaluationError {
    /// Fault lies in the submitted rule text (HTTP 400 class)
    pub fn is_client_error(&self) -> bool {
        matches!(self, EvaluationError::Rules(_))
    }

    /// Fault lies in the backing store
    pub fn is_system_error(&self) -> bool {
        matches!(self, EvaluationError::Store(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            EvaluationError::Rules(e) => e.user_message(),
            EvaluationError::Store(e) => format!("Failed to query records: {}", e),
        }
    }

    pub fn log_code(&self) -> codes::Code {
        match self {
            EvaluationError::Rules(e) => e.error_code(),
            EvaluationError::Store(e) => e.error_code(),
        }
    }

    /// Status code an HTTP surface would answer with
    pub fn http_status(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}
