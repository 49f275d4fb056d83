//! Rule pipeline: rule text -> lines -> conditions -> compiled filter
//!
//! Limits are checked before any parsing work, then every line is parsed
//! (the first failure aborts) and the full condition list is compiled.

mod error;

pub use error::PipelineError;

use crate::compiler::{self, CompiledFilter};
use crate::condition::{self, Condition};
use crate::config::compile_time::rules::{
    MAX_CONDITIONS, MAX_RULE_LINE_LENGTH, MAX_RULE_TEXT_BYTES,
};
use crate::logging::{self, codes};
use std::time::{Duration, Instant};

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Conditions and the filter compiled from them
#[derive(Debug, Clone)]
pub struct ProcessedRules {
    pub conditions: Vec<Condition>,
    pub filter: CompiledFilter,
    pub processing_duration: Duration,
}

impl ProcessedRules {
    fn log_success(&self) {
        crate::log_success!(
            codes::success::FILTER_COMPILED,
            "Rule set compiled",
            "conditions" => self.conditions.len(),
            "store_clauses" => self.filter.store_query.len(),
            "residuals" => self.filter.residuals.len(),
            "duration_ms" => format!("{:.3}", self.processing_duration.as_secs_f64() * 1000.0)
        );

        if logging::config::log_compiled_filters() {
            crate::log_debug!("Compiled store query",
                "store_query" => &self.filter.store_query,
                "residuals" => self.filter.residuals.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" AND ")
            );
        }
    }
}

/// Parse and compile a newline-delimited rule set
pub fn process_rules(text: &str) -> PipelineResult<ProcessedRules> {
    let start_time = Instant::now();

    let result = parse_rules(text).and_then(|conditions| {
        let filter = compiler::compile(&conditions)?;
        Ok(ProcessedRules {
            conditions,
            filter,
            processing_duration: start_time.elapsed(),
        })
    });

    match &result {
        Ok(processed) => processed.log_success(),
        Err(err) => {
            crate::log_error!(err.error_code(), "Rule set rejected",
                "error" => err
            );
        }
    }

    result
}

/// Split, limit-check and parse every line of a rule set
pub fn parse_rules(text: &str) -> PipelineResult<Vec<Condition>> {
    // Blank text of any size is an empty rule set, not an oversized one
    if text.trim().is_empty() {
        return Err(PipelineError::EmptyRuleSet);
    }
    if text.len() > MAX_RULE_TEXT_BYTES {
        return Err(PipelineError::limit_exceeded(
            "rule_text_bytes",
            text.len(),
            MAX_RULE_TEXT_BYTES,
        ));
    }

    let lines = condition::split_rule_lines(text);
    if lines.is_empty() {
        return Err(PipelineError::EmptyRuleSet);
    }
    if lines.len() > MAX_CONDITIONS {
        return Err(PipelineError::limit_exceeded(
            "conditions",
            lines.len(),
            MAX_CONDITIONS,
        ));
    }

    let conditions = lines
        .into_iter()
        .map(|line| {
            if line.len() > MAX_RULE_LINE_LENGTH {
                return Err(PipelineError::limit_exceeded(
                    "rule_line_length",
                    line.len(),
                    MAX_RULE_LINE_LENGTH,
                ));
            }
            Ok(condition::parse_condition(line)?)
        })
        .collect::<PipelineResult<Vec<_>>>()?;

    crate::log_success!(codes::success::RULES_PARSED, "Rule lines parsed",
        "conditions" => conditions.len()
    );

    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CompileError;
    use crate::condition::ParseError;
    use crate::logging::{LogLevel, LoggingService, MemoryLogger};
    use crate::policy::PolicyError;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    #[test]
    fn test_process_rules() {
        let processed =
            process_rules("price > 1000\nstock_status = instock\non_sale = true\n").unwrap();
        assert_eq!(processed.conditions.len(), 3);
        assert_eq!(processed.filter.store_query.len(), 2);
        assert_eq!(processed.filter.residuals.len(), 1);
    }

    #[test]
    fn test_empty_rule_set_is_distinct() {
        assert_matches!(process_rules(""), Err(PipelineError::EmptyRuleSet));
        assert_matches!(process_rules("  \r\n\n\t"), Err(PipelineError::EmptyRuleSet));
        assert_eq!(
            PipelineError::EmptyRuleSet.user_message(),
            "At least one condition required"
        );
    }

    #[test]
    fn test_parse_failure_aborts() {
        let err = process_rules("price > 10\nstock_status instock").unwrap_err();
        assert_matches!(&err, PipelineError::Parse(ParseError::NoOperator { .. }));
        assert_eq!(err.error_code(), codes::parse::NO_OPERATOR);
    }

    #[test]
    fn test_compile_failure_keeps_policy_message() {
        let err = process_rules("color = red").unwrap_err();
        assert_matches!(
            &err,
            PipelineError::Compile(CompileError::Rejected {
                source: PolicyError::UnknownField { .. },
                ..
            })
        );
        assert!(err
            .user_message()
            .starts_with("Unsupported field \"color\". Allowed fields: price"));
    }

    #[test]
    fn test_limits() {
        let long_line = format!("title = {}", "x".repeat(MAX_RULE_LINE_LENGTH));
        assert_matches!(
            process_rules(&long_line),
            Err(PipelineError::LimitExceeded { limit: "rule_line_length", .. })
        );

        let many = "on_sale = true\n".repeat(MAX_CONDITIONS + 1);
        assert_matches!(
            process_rules(&many),
            Err(PipelineError::LimitExceeded { limit: "conditions", .. })
        );

        let huge = format!("on_sale = true{}", " ".repeat(MAX_RULE_TEXT_BYTES));
        assert_matches!(
            process_rules(&huge),
            Err(PipelineError::LimitExceeded { limit: "rule_text_bytes", .. })
        );
    }

    #[test]
    fn test_oversized_blank_text_is_empty_rule_set() {
        assert_matches!(
            process_rules(&"\n".repeat(MAX_RULE_TEXT_BYTES + 1)),
            Err(PipelineError::EmptyRuleSet)
        );
        assert_matches!(
            process_rules(&" \t\r\n".repeat(MAX_RULE_TEXT_BYTES)),
            Err(PipelineError::EmptyRuleSet)
        );
    }

    #[test]
    fn test_outcomes_are_logged_with_codes() {
        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
        if logging::init_global_logging_with_service(service).is_err() {
            // global logger already installed in this process
            return;
        }

        let _ = process_rules("color = red");
        let _ = process_rules("on_sale = true");

        assert!(memory.has_error_with_code(codes::policy::UNKNOWN_FIELD));
        assert!(memory.has_success_with_code(codes::success::FILTER_COMPILED));
    }
}
