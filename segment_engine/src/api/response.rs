//! # Response Envelope
//!
//! `{success: true, count, data}` on success, `{success: false, error}` on failure.

use crate::api::errors::EvaluationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResponse<T> {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// HTTP-style status of the response (not serialized)
    #[serde(skip)]
    pub status: u16,
}

impl<T> SegmentResponse<T> {
    pub fn success(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data: Some(data),
            error: None,
            status: 200,
        }
    }

    pub fn failure(message: impl Into<String>, status: u16) -> Self {
        Self {
            success: false,
            count: None,
            data: None,
            error: Some(message.into()),
            status,
        }
    }

    pub fn from_error(error: &EvaluationError) -> Self {
        Self::failure(error.user_message(), error.http_status())
    }

    pub fn from_result(result: Result<Vec<T>, EvaluationError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::from_error(&error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}
