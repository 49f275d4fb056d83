//! Residual predicate filtering
//!
//! Residual predicates compare fields whose stored text must be converted
//! before comparison. Only `price` is compiled to a residual; any other field
//! reaching this module is a compiler bug.

use crate::api::EvaluatorConfig;
use crate::types::CatalogRecord;
use segment_compiler::compiler::ResidualPredicate;
use segment_compiler::policy::Field;
use std::thread;

/// Check one predicate; a price that does not parse as a number never matches
pub fn satisfies(record: &CatalogRecord, predicate: &ResidualPredicate) -> bool {
    match predicate.field {
        Field::Price => record
            .price_value()
            .map(|actual| predicate.comparison.evaluate(&actual, &predicate.operand))
            .unwrap_or(false),
        other => unreachable!("field {} is never compiled to a residual predicate", other),
    }
}

/// Check every predicate in order, stopping at the first failure
pub fn satisfies_all(record: &CatalogRecord, residuals: &[ResidualPredicate]) -> bool {
    residuals
        .iter()
        .all(|predicate| satisfies(record, predicate))
}

/// Keep candidates satisfying all residuals, preserving candidate order.
///
/// Large candidate sets are split into contiguous chunks evaluated on scoped
/// threads; chunk results are concatenated in order.
pub fn apply_residuals(
    candidates: Vec<CatalogRecord>,
    residuals: &[ResidualPredicate],
    config: &EvaluatorConfig,
) -> Vec<CatalogRecord> {
    if residuals.is_empty() || candidates.is_empty() {
        return candidates;
    }

    let keep = if config.runs_parallel(candidates.len()) {
        parallel_mask(&candidates, residuals, config.max_residual_threads)
    } else {
        candidates
            .iter()
            .map(|record| satisfies_all(record, residuals))
            .collect()
    };

    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect()
}

fn parallel_mask(
    candidates: &[CatalogRecord],
    residuals: &[ResidualPredicate],
    threads: usize,
) -> Vec<bool> {
    let chunk_size = candidates.len().div_ceil(threads.max(1));

    thread::scope(|scope| {
        let handles: Vec<_> = candidates
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|record| satisfies_all(record, residuals))
                        .collect::<Vec<bool>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    })
}
