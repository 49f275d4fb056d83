// RUNTIME PREFERENCES (User Experience)

use super::constants::compile_time::evaluation::{
    DEFAULT_PARALLEL_RESIDUAL_THRESHOLD, MAX_RESIDUAL_THREADS,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Where log events are written
    pub backend: LogBackend,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,

    /// Whether to echo compiled store queries at debug level
    pub log_compiled_filters: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            backend: env::var(env_vars::LOGGING_BACKEND)
                .ok()
                .and_then(|v| parse_log_backend(&v))
                .unwrap_or(LogBackend::Console),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            log_compiled_filters: env::var(env_vars::LOGGING_COMPILED_FILTERS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationPreferences {
    /// Candidate count at which residual filtering goes parallel
    pub parallel_residual_threshold: usize,

    /// Worker threads used for parallel residual filtering
    pub max_residual_threads: usize,
}

impl Default for EvaluationPreferences {
    fn default() -> Self {
        Self {
            parallel_residual_threshold: env::var(env_vars::EVALUATION_PARALLEL_THRESHOLD)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PARALLEL_RESIDUAL_THRESHOLD),
            max_residual_threads: env::var(env_vars::EVALUATION_MAX_THREADS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    std::thread::available_parallelism()
                        .map(|n| n.get())
                        .unwrap_or(4)
                })
                .clamp(1, MAX_RESIDUAL_THREADS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogBackend {
    /// Human readable lines on stderr
    Console,
    /// One JSON object per line on stderr
    Structured,
    /// Forward to the `log` crate (requires the `log-facade` feature)
    Facade,
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

fn parse_log_backend(backend: &str) -> Option<LogBackend> {
    match backend.to_lowercase().as_str() {
        "console" | "text" => Some(LogBackend::Console),
        "structured" | "json" => Some(LogBackend::Structured),
        "facade" | "log" => Some(LogBackend::Facade),
        "silent" | "off" | "none" => Some(LogBackend::Silent),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub logging: LoggingPreferences,
    pub evaluation: EvaluationPreferences,
}

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn error_code(&self) -> crate::logging::codes::Code {
        crate::logging::codes::config::CONFIG_LOAD_FAILURE
    }
}

impl RuntimeConfig {
    /// Parse a TOML document; omitted keys fall back to environment defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: RuntimeConfig = toml::from_str(content)?;
        config.evaluation.max_residual_threads = config
            .evaluation
            .max_residual_threads
            .clamp(1, MAX_RESIDUAL_THREADS);
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Logging
    pub const LOGGING_BACKEND: &str = "SEGMENTS_LOG_BACKEND";
    pub const LOGGING_MIN_LEVEL: &str = "SEGMENTS_LOG_LEVEL";
    pub const LOGGING_COMPILED_FILTERS: &str = "SEGMENTS_LOG_COMPILED_FILTERS";

    // Evaluation
    pub const EVALUATION_PARALLEL_THRESHOLD: &str = "SEGMENTS_PARALLEL_RESIDUAL_THRESHOLD";
    pub const EVALUATION_MAX_THREADS: &str = "SEGMENTS_MAX_RESIDUAL_THREADS";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("WARN"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("2"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("loud"), None);
    }

    #[test]
    fn test_log_backend_parsing() {
        assert_eq!(parse_log_backend("json"), Some(LogBackend::Structured));
        assert_eq!(parse_log_backend("Facade"), Some(LogBackend::Facade));
        assert_eq!(parse_log_backend("off"), Some(LogBackend::Silent));
        assert_eq!(parse_log_backend("syslog"), None);
    }

    #[test]
    fn test_from_toml_str() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [logging]
            backend = "structured"
            min_log_level = "debug"

            [evaluation]
            parallel_residual_threshold = 500
            max_residual_threads = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.backend, LogBackend::Structured);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert_eq!(config.evaluation.parallel_residual_threshold, 500);
        assert_eq!(config.evaluation.max_residual_threads, MAX_RESIDUAL_THREADS);
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_backend() {
        let result = RuntimeConfig::from_toml_str("[logging]\nbackend = \"syslog\"\n");
        assert_matches!(result, Err(ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[evaluation]\nparallel_residual_threshold = 7").unwrap();

        let config = RuntimeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.evaluation.parallel_residual_threshold, 7);
        assert!(config.evaluation.max_residual_threads >= 1);
    }

    #[test]
    fn test_load_missing_file() {
        let result = RuntimeConfig::load_from_file("/nonexistent/segments.toml");
        assert_matches!(result, Err(ConfigError::Io { .. }));
    }
}
