//! Error types for condition line parsing

use crate::logging::codes;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Failure to turn one rule line into a condition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// None of the operator tokens occurs in the line
    #[error("No operator found in condition '{line}'")]
    NoOperator { line: String },

    /// Operator found but the line does not split into exactly a field and a value
    #[error("Malformed condition '{line}': {reason}")]
    MalformedCondition { line: String, reason: String },
}

impl ParseError {
    pub fn no_operator(line: &str) -> Self {
        Self::NoOperator {
            line: line.to_string(),
        }
    }

    pub fn malformed(line: &str, reason: impl Into<String>) -> Self {
        Self::MalformedCondition {
            line: line.to_string(),
            reason: reason.into(),
        }
    }

    /// The offending rule line
    pub fn line(&self) -> &str {
        match self {
            Self::NoOperator { line } | Self::MalformedCondition { line, .. } => line,
        }
    }

    pub fn error_code(&self) -> codes::Code {
        match self {
            Self::NoOperator { .. } => codes::parse::NO_OPERATOR,
            Self::MalformedCondition { .. } => codes::parse::MALFORMED_CONDITION,
        }
    }
}
