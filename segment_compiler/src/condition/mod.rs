//! Condition line parsing
//!
//! A rule set is newline-delimited text with one `field <op> value` condition
//! per line. This module turns a single line into a typed [`Condition`]; field
//! and operator legality is checked later by [`crate::policy`].

pub mod error;
pub mod operator;
pub mod value;

pub use error::{ParseError, ParseResult};
pub use operator::{Comparison, Operator, OPERATOR_DETECTION_ORDER};
pub use value::ConditionValue;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed rule line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: ConditionValue,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: ConditionValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Parse a single rule line (see [`parse_condition`])
    pub fn parse(line: &str) -> ParseResult<Self> {
        parse_condition(line)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Find the operator at the earliest position in the line.
///
/// At each position the tokens are tried in [`OPERATOR_DETECTION_ORDER`], so a
/// two-character token beats its one-character prefix.
pub fn detect_operator(line: &str) -> Option<Operator> {
    line.char_indices().find_map(|(index, _)| {
        let rest = &line[index..];
        OPERATOR_DETECTION_ORDER
            .iter()
            .copied()
            .find(|op| rest.starts_with(op.token()))
    })
}

/// Parse one rule line into a condition
pub fn parse_condition(line: &str) -> ParseResult<Condition> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::malformed(line, "condition is blank"));
    }

    let operator = detect_operator(line).ok_or_else(|| ParseError::no_operator(line))?;

    let parts: Vec<&str> = line.split(operator.token()).collect();
    if parts.len() != 2 {
        return Err(ParseError::malformed(
            line,
            format!(
                "expected exactly one '{}' between field and value, found {}",
                operator,
                parts.len() - 1
            ),
        ));
    }

    let field = parts[0].trim();
    let raw_value = parts[1].trim();

    if field.is_empty() {
        return Err(ParseError::malformed(line, "field name is missing"));
    }
    if raw_value.is_empty() {
        return Err(ParseError::malformed(line, "value is missing"));
    }

    Ok(Condition::new(
        field,
        operator,
        ConditionValue::coerce(raw_value),
    ))
}

/// Split rule text into trimmed, non-blank lines (`\n` or `\r\n`)
pub fn split_rule_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_numeric_condition() {
        let condition = parse_condition("price > 1000").unwrap();
        assert_eq!(condition.field, "price");
        assert_eq!(condition.operator, Operator::GreaterThan);
        assert_eq!(condition.value, ConditionValue::Number(1000.0));
    }

    #[test]
    fn test_two_character_operator_is_not_split() {
        let condition = parse_condition("stock_quantity >= 5").unwrap();
        assert_eq!(condition.field, "stock_quantity");
        assert_eq!(condition.operator, Operator::GreaterThanOrEqual);
        assert_eq!(condition.value, ConditionValue::Number(5.0));

        let condition = parse_condition("id<=10").unwrap();
        assert_eq!(condition.operator, Operator::LessThanOrEqual);
        assert_eq!(condition.value, ConditionValue::Number(10.0));
    }

    #[test]
    fn test_equals_spellings_are_kept() {
        assert_eq!(
            parse_condition("on_sale = true").unwrap().operator,
            Operator::Equals
        );
        assert_eq!(
            parse_condition("on_sale == true").unwrap().operator,
            Operator::DoubleEquals
        );
        assert_eq!(
            parse_condition("on_sale = true").unwrap().value,
            ConditionValue::Boolean(true)
        );
    }

    #[test]
    fn test_not_equals() {
        let condition = parse_condition("tags != clearance").unwrap();
        assert_eq!(condition.operator, Operator::NotEquals);
        assert_eq!(
            condition.value,
            ConditionValue::String("clearance".to_string())
        );
    }

    #[test]
    fn test_earliest_position_wins() {
        // '=' occurs before '>' so the line splits on '='
        let condition = parse_condition("title = a>b").unwrap();
        assert_eq!(condition.operator, Operator::Equals);
        assert_eq!(condition.value, ConditionValue::String("a>b".to_string()));

        let condition = parse_condition("title > a=b");
        assert_matches!(condition, Ok(Condition { operator: Operator::GreaterThan, .. }));
    }

    #[test]
    fn test_quoted_value() {
        let condition = parse_condition("title = \"Blue Shirt\"").unwrap();
        assert_eq!(
            condition.value,
            ConditionValue::String("Blue Shirt".to_string())
        );
    }

    #[test]
    fn test_no_operator() {
        assert_matches!(
            parse_condition("price 1000"),
            Err(ParseError::NoOperator { line }) if line == "price 1000"
        );
    }

    #[test]
    fn test_repeated_operator_is_malformed() {
        assert_matches!(
            parse_condition("price = 10 = 20"),
            Err(ParseError::MalformedCondition { .. })
        );
        assert_matches!(
            parse_condition("price > 10 > 5"),
            Err(ParseError::MalformedCondition { .. })
        );
    }

    #[test]
    fn test_missing_field_or_value_is_malformed() {
        assert_matches!(
            parse_condition("= 10"),
            Err(ParseError::MalformedCondition { .. })
        );
        assert_matches!(
            parse_condition("price >"),
            Err(ParseError::MalformedCondition { .. })
        );
    }

    #[test]
    fn test_display() {
        let condition = parse_condition("  category ==  shoes ").unwrap();
        assert_eq!(condition.to_string(), "category == \"shoes\"");
    }

    #[test]
    fn test_split_rule_lines() {
        let text = "price > 1000\r\n\n   \n  stock_status = instock  \non_sale = true";
        assert_eq!(
            split_rule_lines(text),
            vec!["price > 1000", "stock_status = instock", "on_sale = true"]
        );
        assert!(split_rule_lines(" \n\r\n\t").is_empty());
    }
}
