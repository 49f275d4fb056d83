//! Global logging module for segment evaluation
//!
//! Provides thread-safe global logging with per-request context and a small
//! macro interface. Logging is optional: until [`init_global_logging`] runs,
//! every macro is a no-op.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::config::runtime::LoggingPreferences;
use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static EVALUATION_CONTEXT: RefCell<Option<EvaluationContext>> = const { RefCell::new(None) };
}

/// Identifies the evaluation request a log event belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationContext {
    pub request_id: String,
}

impl EvaluationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Fresh context with a random request id
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from environment-derived preferences
pub fn init_global_logging() -> Result<(), String> {
    let service = Arc::new(service::create_configured_service());
    install(service)
}

/// Initialize global logging with explicit preferences (e.g. from a TOML file)
pub fn init_global_logging_with_preferences(
    preferences: LoggingPreferences,
) -> Result<(), String> {
    config::init_runtime_preferences(preferences)?;
    init_global_logging()
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    install(service)
}

fn install(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// EVALUATION CONTEXT MANAGEMENT
// ============================================================================

/// Set evaluation context for current thread
pub fn set_evaluation_context(context: EvaluationContext) {
    EVALUATION_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

/// Clear evaluation context for current thread
pub fn clear_evaluation_context() {
    EVALUATION_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with evaluation context, restoring the previous one afterwards
pub fn with_evaluation_context<F, R>(context: EvaluationContext, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = get_current_evaluation_context();
    set_evaluation_context(context);
    let result = f();
    match previous {
        Some(previous) => set_evaluation_context(previous),
        None => clear_evaluation_context(),
    }
    result
}

/// Get current evaluation context (used by macros)
pub fn get_current_evaluation_context() -> Option<EvaluationContext> {
    EVALUATION_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn decorate(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, &config::truncate_context_value(value));
    }

    if let Some(evaluation) = get_current_evaluation_context() {
        event = event.with_context("request_id", &evaluation.request_id);
    }

    event
}

/// Emit an event through the global logger, if one is installed
pub fn dispatch(event: LogEvent, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        if logger.should_log(event.level) {
            logger.log_event(decorate(event, context));
        }
    }
}

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::error(code, message), context);
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::success(code, message), context);
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::info(message), context);
}

/// Log warning with context (used by log_warning! macro)
pub fn log_warning_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::warning(message), context);
}

/// Log debug with context (used by log_debug! macro)
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::debug(message), context);
}

/// Check whether debug events would be written (lets callers skip formatting)
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// SAFE FALLBACK LOGGING
// ============================================================================

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

/// Get system diagnostics
pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    if let Some(logger) = try_get_global_logger() {
        diagnostics.push_str(&format!("Active level: {}\n", logger.min_level().as_str()));
    }
    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_context_management() {
        assert!(get_current_evaluation_context().is_none());

        set_evaluation_context(EvaluationContext::new("req-1"));
        assert_eq!(
            get_current_evaluation_context().map(|c| c.request_id),
            Some("req-1".to_string())
        );

        clear_evaluation_context();
        assert!(get_current_evaluation_context().is_none());
    }

    #[test]
    fn test_with_evaluation_context_restores_previous() {
        set_evaluation_context(EvaluationContext::new("outer"));

        let result = with_evaluation_context(EvaluationContext::new("inner"), || {
            assert_eq!(
                get_current_evaluation_context().unwrap().request_id,
                "inner"
            );
            42
        });

        assert_eq!(result, 42);
        assert_eq!(get_current_evaluation_context().unwrap().request_id, "outer");
        clear_evaluation_context();
    }

    #[test]
    fn test_generated_request_ids_are_unique() {
        let a = EvaluationContext::generate();
        let b = EvaluationContext::generate();
        assert_ne!(a, b);
        assert_eq!(a.request_id.len(), 36);
    }

    #[test]
    fn test_decorate_adds_request_id() {
        let event = with_evaluation_context(EvaluationContext::new("req-9"), || {
            decorate(LogEvent::info("hello"), vec![("rules", "3")])
        });

        assert_eq!(event.context.get("request_id"), Some(&"req-9".to_string()));
        assert_eq!(event.context.get("rules"), Some(&"3".to_string()));
    }

    #[test]
    fn test_safe_logging() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Initialized:"));
    }
}
