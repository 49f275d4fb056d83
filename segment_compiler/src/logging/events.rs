//! Event system for segment logging

use super::codes::{self, Code};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
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
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    /// Ordered so formatted output is stable
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn with_level(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.to_string(),
            context: BTreeMap::new(),
        }
    }

    /// Create a new error event
    pub fn error(error_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Error, error_code, message)
    }

    /// Create a new warning event (warnings may not have codes)
    pub fn warning(message: &str) -> Self {
        Self::with_level(LogLevel::Warning, Code::new("W000"), message)
    }

    /// Create warning with specific code
    pub fn warning_with_code(warning_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Warning, warning_code, message)
    }

    /// Create a new info event
    pub fn info(message: &str) -> Self {
        Self::with_level(LogLevel::Info, Code::new("I000"), message)
    }

    /// Create a success event (info with success code)
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Info, success_code, message)
    }

    /// Create a debug event
    pub fn debug(message: &str) -> Self {
        Self::with_level(LogLevel::Debug, Code::new("D000"), message)
    }

    /// Add context data
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn is_debug(&self) -> bool {
        self.level == LogLevel::Debug
    }

    /// Get severity from error code
    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    /// Format for display
    pub fn format(&self) -> String {
        let mut output = format!(
            "[{}] {} - {}",
            self.level.as_str(),
            self.code.as_str(),
            self.message
        );

        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            output.push_str(&format!(" ({})", pairs.join(", ")));
        }

        output
    }

    /// Format as JSON for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
        });

        if self.is_error() {
            json["error_metadata"] = serde_json::json!({
                "severity": self.severity(),
                "caller_correctable": codes::is_caller_correctable(self.code.as_str()),
                "description": codes::get_description(self.code.as_str()),
                "recommended_action": codes::get_action(self.code.as_str()),
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::Value::Object(
                self.context
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            );
        }

        serde_json::to_string(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::policy::UNKNOWN_FIELD, "Unknown field 'foo'");

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E120");
        assert_eq!(event.category(), "Policy");
    }

    #[test]
    fn test_event_formatting_includes_context() {
        let event = LogEvent::error(codes::parse::NO_OPERATOR, "No operator found")
            .with_context("line", "price 1000");
        let formatted = event.format();

        assert!(formatted.starts_with("[ERROR] E101 - No operator found"));
        assert!(formatted.contains("line=price 1000"));
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::success(codes::success::EVALUATION_COMPLETE, "Segment evaluated")
            .with_context("matched", "3");

        let json: serde_json::Value = serde_json::from_str(&event.format_json().unwrap()).unwrap();
        assert_eq!(json["level"], "INFO");
        assert_eq!(json["code"], "I020");
        assert_eq!(json["context"]["matched"], "3");
        assert!(json.get("error_metadata").is_none());
    }

    #[test]
    fn test_json_error_metadata() {
        let event = LogEvent::error(codes::store::STORE_ACCESS_FAILURE, "Store unavailable");
        let json: serde_json::Value = serde_json::from_str(&event.format_json().unwrap()).unwrap();

        assert_eq!(json["error_metadata"]["severity"], "High");
        assert_eq!(json["error_metadata"]["caller_correctable"], false);
    }
}
