//! Configuration access for logging
//!
//! Runtime preferences are installed once per process; until then the
//! environment-derived defaults apply.

use crate::config::compile_time::logging::MAX_LOG_CONTEXT_VALUE_LENGTH;
use crate::config::runtime::{LogBackend, LoggingPreferences};
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

/// Get runtime preferences (with fallback to defaults)
fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Get minimum log level
pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

/// Selected log backend
pub fn backend() -> LogBackend {
    get_runtime_preferences().backend
}

/// Check if compiled store queries should be echoed at debug level
pub fn log_compiled_filters() -> bool {
    get_runtime_preferences().log_compiled_filters
}

/// Clip a context value so echoed rule text cannot flood the log
pub fn truncate_context_value(value: &str) -> String {
    if value.chars().count() <= MAX_LOG_CONTEXT_VALUE_LENGTH {
        return value.to_string();
    }

    let clipped: String = value.chars().take(MAX_LOG_CONTEXT_VALUE_LENGTH).collect();
    format!("{}...", clipped)
}

/// Get configuration summary for diagnostics
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();
    format!(
        "Logging backend: {:?}\nMinimum level: {}\nLog compiled filters: {}\n",
        preferences.backend,
        preferences.min_log_level.as_str(),
        preferences.log_compiled_filters
    )
}
