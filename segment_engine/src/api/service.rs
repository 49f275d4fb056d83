//! # Segment Service
//!
//! Request-level entry points returning the response envelope.
use crate::api::response::SegmentResponse;
use crate::execution::SegmentEvaluator;
use crate::types::CatalogRecord;

/// Wraps an evaluator with envelope-producing request handlers
pub struct SegmentService {
    evaluator: SegmentEvaluator,
}

impl SegmentService {
    pub fn new(evaluator: SegmentEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &SegmentEvaluator {
        &self.evaluator
    }

    /// Evaluate a rule set
    pub fn evaluate(&self, rules: &str) -> SegmentResponse<CatalogRecord> {
        SegmentResponse::from_result(self.evaluator.evaluate(rules))
    }

    /// List every stored record
    pub fn products(&self) -> SegmentResponse<CatalogRecord> {
        match self.evaluator.store().all() {
            Ok(records) => SegmentResponse::success(records),
            Err(error) => {
                segment_compiler::log_error!(error.error_code(), "Failed to list records",
                    "error" => &error
                );
                SegmentResponse::failure(error.to_string(), 500)
            }
        }
    }
}
