//! Compiled filter types handed from the compiler to the evaluator

use crate::condition::Comparison;
use crate::policy::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operand of a pushed-down comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Predicate a record store evaluates for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldPredicate {
    Compare {
        comparison: Comparison,
        value: StoreValue,
    },
    /// Set membership (tags)
    Contains { value: String },
    NotContains { value: String },
}

impl fmt::Display for FieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { comparison, value } => write!(f, "{} {}", comparison, value),
            Self::Contains { value } => write!(f, "contains \"{}\"", value),
            Self::NotContains { value } => write!(f, "not contains \"{}\"", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreClause {
    pub field: Field,
    pub predicate: FieldPredicate,
}

impl StoreClause {
    pub fn compare(field: Field, comparison: Comparison, value: StoreValue) -> Self {
        Self {
            field,
            predicate: FieldPredicate::Compare { comparison, value },
        }
    }

    pub fn contains(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            predicate: FieldPredicate::Contains {
                value: value.into(),
            },
        }
    }

    pub fn not_contains(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            predicate: FieldPredicate::NotContains {
                value: value.into(),
            },
        }
    }
}

impl fmt::Display for StoreClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.predicate)
    }
}

/// Conjunction of clauses the record store executes in one call.
/// No clauses matches every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreQuery {
    pub clauses: Vec<StoreClause>,
}

impl StoreQuery {
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn push(&mut self, clause: StoreClause) {
        self.clauses.push(clause);
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for StoreQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "<all>");
        }
        let rendered: Vec<String> = self.clauses.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join(" AND "))
    }
}

/// Numeric comparison applied after retrieval to a text-encoded field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualPredicate {
    pub field: Field,
    pub comparison: Comparison,
    pub operand: f64,
}

impl ResidualPredicate {
    pub fn new(field: Field, comparison: Comparison, operand: f64) -> Self {
        Self {
            field,
            comparison,
            operand,
        }
    }
}

impl fmt::Display for ResidualPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.comparison, self.operand)
    }
}

/// Result of compiling one rule set: built per request, never shared
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledFilter {
    pub store_query: StoreQuery,
    pub residuals: Vec<ResidualPredicate>,
}

impl CompiledFilter {
    pub fn has_residuals(&self) -> bool {
        !self.residuals.is_empty()
    }

    /// Total number of conditions represented
    pub fn condition_count(&self) -> usize {
        self.store_query.len() + self.residuals.len()
    }
}
