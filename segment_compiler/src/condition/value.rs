use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Decimal literal: optional sign, digits with optional fraction (or a bare
/// fraction), optional exponent.
const NUMERIC_LITERAL_PATTERN: &str = r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$";

static NUMERIC_LITERAL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn numeric_literal() -> Result<&'static Regex, &'static regex::Error> {
    NUMERIC_LITERAL
        .get_or_init(|| Regex::new(NUMERIC_LITERAL_PATTERN))
        .as_ref()
}

fn is_numeric_literal(raw: &str) -> bool {
    match numeric_literal() {
        Ok(pattern) => pattern.is_match(raw),
        Err(error) => {
            crate::log_error!(crate::logging::codes::system::INTERNAL_ERROR,
                "Numeric literal pattern failed to compile",
                "error" => error
            );
            false
        }
    }
}

/// Typed literal on the right-hand side of a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl ConditionValue {
    /// Coerce a trimmed raw value.
    ///
    /// Priority: quoted string, then boolean, then decimal number, then bare
    /// string. Quoted text is never re-interpreted, so `"true"` stays a string.
    pub fn coerce(raw: &str) -> Self {
        if let Some(inner) = strip_matching_quotes(raw) {
            return Self::String(inner.to_string());
        }

        if raw.eq_ignore_ascii_case("true") {
            return Self::Boolean(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Boolean(false);
        }

        if let Some(number) = parse_numeric_literal(raw) {
            return Self::Number(number);
        }

        Self::String(raw.to_string())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical text form, used when a string field receives any literal
    pub fn to_canonical_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
        }
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

fn strip_matching_quotes(raw: &str) -> Option<&str> {
    if raw.len() < 2 {
        return None;
    }
    ['"', '\''].into_iter().find_map(|quote| {
        raw.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

/// Parse a decimal literal; overflow to infinity is treated as not a number
pub fn parse_numeric_literal(raw: &str) -> Option<f64> {
    if !is_numeric_literal(raw) {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}
