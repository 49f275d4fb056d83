//! Error types for field policy validation

use crate::condition::Operator;
use crate::logging::codes;
use thiserror::Error;

pub type PolicyResult<T> = Result<T, PolicyError>;

/// A parsed condition that the field schema rejects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("Unsupported field \"{field}\". Allowed fields: {}", allowed.join(", "))]
    UnknownField {
        field: String,
        allowed: Vec<&'static str>,
    },

    #[error("Operator {operator} unsupported for field {field}")]
    UnsupportedOperator { field: String, operator: Operator },

    #[error("Invalid value {value} for field {field}: expected {expected}")]
    TypeCoercion {
        field: String,
        value: String,
        expected: &'static str,
    },
}

impl PolicyError {
    pub fn unknown_field(field: &str, allowed: Vec<&'static str>) -> Self {
        Self::UnknownField {
            field: field.to_string(),
            allowed,
        }
    }

    pub fn unsupported_operator(field: &str, operator: Operator) -> Self {
        Self::UnsupportedOperator {
            field: field.to_string(),
            operator,
        }
    }

    pub fn type_coercion(field: &str, value: impl ToString, expected: &'static str) -> Self {
        Self::TypeCoercion {
            field: field.to_string(),
            value: value.to_string(),
            expected,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::UnknownField { field, .. }
            | Self::UnsupportedOperator { field, .. }
            | Self::TypeCoercion { field, .. } => field,
        }
    }

    pub fn error_code(&self) -> codes::Code {
        match self {
            Self::UnknownField { .. } => codes::policy::UNKNOWN_FIELD,
            Self::UnsupportedOperator { .. } => codes::policy::UNSUPPORTED_OPERATOR,
            Self::TypeCoercion { .. } => codes::policy::TYPE_COERCION,
        }
    }
}
