//! Consolidated log codes and classification system
//!
//! Single source of truth for every code the rule compiler and evaluator emit,
//! together with the metadata used for structured output.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    /// Whether the caller can fix the problem by editing the rule text
    pub caller_correctable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        caller_correctable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            caller_correctable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Rule text parsing error codes
pub mod parse {
    use super::Code;

    pub const NO_OPERATOR: Code = Code::new("E101");
    pub const MALFORMED_CONDITION: Code = Code::new("E102");
    pub const EMPTY_RULE_SET: Code = Code::new("E103");
    pub const LIMIT_EXCEEDED: Code = Code::new("E104");
}

/// Field policy error codes
pub mod policy {
    use super::Code;

    pub const UNKNOWN_FIELD: Code = Code::new("E120");
    pub const UNSUPPORTED_OPERATOR: Code = Code::new("E121");
    pub const TYPE_COERCION: Code = Code::new("E122");
}

/// Record store error codes
pub mod store {
    use super::Code;

    pub const STORE_ACCESS_FAILURE: Code = Code::new("E140");
    pub const STORE_LOCK_POISONED: Code = Code::new("E141");
}

/// Ingestion error codes
pub mod ingest {
    use super::Code;

    pub const INVALID_SOURCE_RECORD: Code = Code::new("E160");
    pub const SOURCE_DECODE_FAILURE: Code = Code::new("E161");
}

/// Configuration error codes
pub mod config {
    use super::Code;

    pub const CONFIG_LOAD_FAILURE: Code = Code::new("E180");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const RULES_PARSED: Code = Code::new("I010");
    pub const FILTER_COMPILED: Code = Code::new("I011");
    pub const EVALUATION_COMPLETE: Code = Code::new("I020");
    pub const INGESTION_COMPLETE: Code = Code::new("I030");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Critical internal error",
                "File a bug report with the rule text that triggered it",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                "System initialization failure",
                "Check logging and runtime configuration",
            ),
            ErrorMetadata::new(
                "E101",
                "Parse",
                Severity::Medium,
                true,
                "Condition line contains no comparison operator",
                "Write each condition as `field operator value`",
            ),
            ErrorMetadata::new(
                "E102",
                "Parse",
                Severity::Medium,
                true,
                "Condition line could not be split into field and value",
                "Use exactly one operator per line and supply both sides",
            ),
            ErrorMetadata::new(
                "E103",
                "Parse",
                Severity::Low,
                true,
                "Rule text contains no conditions",
                "Supply at least one non-blank condition line",
            ),
            ErrorMetadata::new(
                "E104",
                "Parse",
                Severity::Medium,
                true,
                "Rule text exceeds an implementation limit",
                "Shorten the rule text or split it into smaller segments",
            ),
            ErrorMetadata::new(
                "E120",
                "Policy",
                Severity::Medium,
                true,
                "Condition references a field outside the schema",
                "Use one of the allowed field names",
            ),
            ErrorMetadata::new(
                "E121",
                "Policy",
                Severity::Medium,
                true,
                "Operator is not legal for the field type",
                "Use an operator the field accepts",
            ),
            ErrorMetadata::new(
                "E122",
                "Policy",
                Severity::Medium,
                true,
                "Value cannot be coerced to the field type",
                "Supply a value of the type the field expects",
            ),
            ErrorMetadata::new(
                "E140",
                "Store",
                Severity::High,
                false,
                "Record store query failed",
                "Check record store availability and retry the request",
            ),
            ErrorMetadata::new(
                "E141",
                "Store",
                Severity::Critical,
                false,
                "Record store lock poisoned by a panicking writer",
                "Restart the process to rebuild the store",
            ),
            ErrorMetadata::new(
                "E160",
                "Ingest",
                Severity::Low,
                false,
                "Source record is missing required data",
                "Inspect the upstream product payload",
            ),
            ErrorMetadata::new(
                "E161",
                "Ingest",
                Severity::High,
                false,
                "Source payload could not be decoded",
                "Verify the source file contains a JSON array of products",
            ),
            ErrorMetadata::new(
                "E180",
                "Config",
                Severity::High,
                false,
                "Runtime configuration could not be loaded",
                "Check the configuration file path and TOML syntax",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Low)
}

pub fn is_caller_correctable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.caller_correctable)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    if let Some(metadata) = get_error_metadata(code) {
        return metadata.category;
    }

    match code.chars().next() {
        Some('I') => "Success",
        Some('W') => "Warning",
        Some('D') => "Debug",
        _ => "Unknown",
    }
}
