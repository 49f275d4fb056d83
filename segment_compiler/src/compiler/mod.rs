//! Query compiler: parsed conditions -> store query + residual predicates
//!
//! Conditions are folded in order with AND semantics. Fields the store can
//! evaluate natively become [`StoreClause`]s; fields whose stored form does
//! not match their semantic type (`price` is persisted as text) become
//! [`ResidualPredicate`]s applied after retrieval.

pub mod error;
pub mod filter;
pub mod timestamp;

pub use error::{CompileError, CompileResult};
pub use filter::{
    CompiledFilter, FieldPredicate, ResidualPredicate, StoreClause, StoreQuery, StoreValue,
};
pub use timestamp::{format_timestamp, normalize_timestamp, parse_timestamp};

use crate::condition::{Comparison, Condition, ConditionValue};
use crate::policy::{self, FieldSpec, FieldType, PolicyError, PolicyResult};

/// Compile conditions into a filter; the first rejected condition aborts
pub fn compile(conditions: &[Condition]) -> CompileResult<CompiledFilter> {
    let mut filter = CompiledFilter::default();

    for (index, condition) in conditions.iter().enumerate() {
        compile_condition(condition, &mut filter)
            .map_err(|source| CompileError::rejected(index + 1, condition, source))?;
    }

    Ok(filter)
}

fn compile_condition(condition: &Condition, filter: &mut CompiledFilter) -> PolicyResult<()> {
    let spec = policy::validate(condition)?;
    let comparison = condition.operator.comparison();

    if !spec.pushdown {
        let operand = require_number(spec, &condition.value)?;
        filter
            .residuals
            .push(ResidualPredicate::new(spec.field, comparison, operand));
        return Ok(());
    }

    let clause = match spec.field_type {
        FieldType::Integer | FieldType::Number | FieldType::TextEncodedNumber => {
            let value = require_number(spec, &condition.value)?;
            StoreClause::compare(spec.field, comparison, StoreValue::Number(value))
        }
        FieldType::String | FieldType::EnumeratedString => StoreClause::compare(
            spec.field,
            comparison,
            StoreValue::Text(condition.value.to_canonical_string()),
        ),
        FieldType::StringSet => {
            let tag = condition.value.to_canonical_string();
            match comparison {
                Comparison::Eq => StoreClause::contains(spec.field, tag),
                Comparison::Ne => StoreClause::not_contains(spec.field, tag),
                _ => {
                    return Err(PolicyError::unsupported_operator(
                        spec.name(),
                        condition.operator,
                    ))
                }
            }
        }
        FieldType::Boolean => {
            let value = condition.value.as_bool().ok_or_else(|| {
                PolicyError::type_coercion(
                    spec.name(),
                    &condition.value,
                    spec.field_type.expected_value(),
                )
            })?;
            StoreClause::compare(spec.field, comparison, StoreValue::Boolean(value))
        }
        FieldType::Date => compile_date(spec, condition, comparison)?,
    };

    filter.store_query.push(clause);
    Ok(())
}

/// Dates that parse are normalized and accept every operator; anything else
/// is compared as raw text and only supports equality.
fn compile_date(
    spec: &FieldSpec,
    condition: &Condition,
    comparison: Comparison,
) -> PolicyResult<StoreClause> {
    let raw = condition.value.to_canonical_string();

    match normalize_timestamp(&raw) {
        Some(normalized) => Ok(StoreClause::compare(
            spec.field,
            comparison,
            StoreValue::Text(normalized),
        )),
        None if condition.operator.is_range() => Err(PolicyError::type_coercion(
            spec.name(),
            &condition.value,
            spec.field_type.expected_value(),
        )),
        None => Ok(StoreClause::compare(
            spec.field,
            comparison,
            StoreValue::Text(raw),
        )),
    }
}

fn require_number(spec: &FieldSpec, value: &ConditionValue) -> PolicyResult<f64> {
    value.as_number().ok_or_else(|| {
        PolicyError::type_coercion(spec.name(), value, spec.field_type.expected_value())
    })
}
