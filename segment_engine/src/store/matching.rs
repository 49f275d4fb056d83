//! Clause evaluation against a single record
//!
//! Mirrors document-store semantics: equality on a list field means
//! membership, `!=` matches records where the field is absent, and every
//! other comparison against an absent field fails.

use crate::types::CatalogRecord;
use segment_compiler::compiler::{FieldPredicate, StoreClause, StoreQuery, StoreValue};
use segment_compiler::condition::Comparison;
use segment_compiler::policy::Field;

/// Borrowed view of one stored field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoredValue<'a> {
    Null,
    Text(&'a str),
    Integer(i128),
    Boolean(bool),
    List(&'a [String]),
}

pub fn stored_value(record: &CatalogRecord, field: Field) -> StoredValue<'_> {
    fn text(value: &Option<String>) -> StoredValue<'_> {
        value
            .as_deref()
            .map(StoredValue::Text)
            .unwrap_or(StoredValue::Null)
    }

    match field {
        Field::Price => StoredValue::Text(&record.price),
        Field::StockStatus => text(&record.stock_status),
        Field::StockQuantity => record
            .stock_quantity
            .map(|quantity| StoredValue::Integer(quantity.into()))
            .unwrap_or(StoredValue::Null),
        Field::Category => text(&record.category),
        Field::Tags => StoredValue::List(&record.tags),
        Field::OnSale => StoredValue::Boolean(record.on_sale),
        Field::CreatedAt => text(&record.created_at),
        Field::Title => StoredValue::Text(&record.title),
        Field::Id => StoredValue::Integer(record.id.into()),
    }
}

/// All clauses hold (an empty query matches everything)
pub fn record_matches(record: &CatalogRecord, query: &StoreQuery) -> bool {
    query
        .clauses
        .iter()
        .all(|clause| clause_matches(record, clause))
}

pub fn clause_matches(record: &CatalogRecord, clause: &StoreClause) -> bool {
    let stored = stored_value(record, clause.field);

    match &clause.predicate {
        FieldPredicate::Compare { comparison, value } => compare(stored, *comparison, value),
        FieldPredicate::Contains { value } => list_contains(stored, value),
        FieldPredicate::NotContains { value } => !list_contains(stored, value),
    }
}

fn list_contains(stored: StoredValue<'_>, value: &str) -> bool {
    match stored {
        StoredValue::List(items) => items.iter().any(|item| item == value),
        StoredValue::Text(text) => text == value,
        _ => false,
    }
}

fn compare(stored: StoredValue<'_>, comparison: Comparison, value: &StoreValue) -> bool {
    match (stored, value) {
        (StoredValue::Null, _) => comparison == Comparison::Ne,
        (StoredValue::Text(actual), StoreValue::Text(expected)) => {
            comparison.evaluate(actual, expected.as_str())
        }
        (StoredValue::Integer(actual), StoreValue::Number(expected)) => {
            compare_integer(actual, comparison, *expected)
        }
        (StoredValue::Boolean(actual), StoreValue::Boolean(expected)) => {
            comparison.evaluate(&actual, expected)
        }
        (StoredValue::List(_), StoreValue::Text(expected)) => match comparison {
            Comparison::Eq => list_contains(stored, expected),
            Comparison::Ne => !list_contains(stored, expected),
            _ => false,
        },
        // Values of different types are never equal and never ordered
        _ => comparison == Comparison::Ne,
    }
}

/// Whole operands compare exactly; fractional ones fall back to floats
fn compare_integer(actual: i128, comparison: Comparison, expected: f64) -> bool {
    if expected.fract() == 0.0 && expected.abs() < i128::MAX as f64 {
        comparison.evaluate(&actual, &(expected as i128))
    } else {
        comparison.evaluate(&(actual as f64), &expected)
    }
}
