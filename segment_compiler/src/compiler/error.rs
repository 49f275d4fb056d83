use crate::condition::Condition;
use crate::logging::codes;
use crate::policy::PolicyError;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

/// Compilation aborts on the first rejected condition; no partial filter is produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Condition {position} ({condition}) rejected: {source}")]
    Rejected {
        /// 1-based position in the rule set
        position: usize,
        condition: String,
        #[source]
        source: PolicyError,
    },
}

impl CompileError {
    pub fn rejected(position: usize, condition: &Condition, source: PolicyError) -> Self {
        Self::Rejected {
            position,
            condition: condition.to_string(),
            source,
        }
    }

    pub fn policy_error(&self) -> &PolicyError {
        match self {
            Self::Rejected { source, .. } => source,
        }
    }

    pub fn error_code(&self) -> codes::Code {
        self.policy_error().error_code()
    }
}
