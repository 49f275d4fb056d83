use crate::compiler::CompileError;
use crate::condition::ParseError;
use crate::logging::codes;

/// Rule pipeline errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("At least one condition required")]
    EmptyRuleSet,

    #[error("Rule limit exceeded: {limit} is {actual}, maximum allowed is {maximum}")]
    LimitExceeded {
        limit: &'static str,
        actual: usize,
        maximum: usize,
    },

    #[error("Rule parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Rule compilation failed: {0}")]
    Compile(#[from] CompileError),
}

impl PipelineError {
    pub fn limit_exceeded(limit: &'static str, actual: usize, maximum: usize) -> Self {
        Self::LimitExceeded {
            limit,
            actual,
            maximum,
        }
    }

    pub fn error_code(&self) -> codes::Code {
        match self {
            Self::EmptyRuleSet => codes::parse::EMPTY_RULE_SET,
            Self::LimitExceeded { .. } => codes::parse::LIMIT_EXCEEDED,
            Self::Parse(err) => err.error_code(),
            Self::Compile(err) => err.error_code(),
        }
    }

    /// Message suitable for returning to the caller who wrote the rules
    pub fn user_message(&self) -> String {
        match self {
            Self::Parse(err) => err.to_string(),
            Self::Compile(err) => err.policy_error().to_string(),
            Self::EmptyRuleSet | Self::LimitExceeded { .. } => self.to_string(),
        }
    }
}
