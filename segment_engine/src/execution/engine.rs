//! # Segment Evaluator
//!
//! Runs one evaluation request: rule text is compiled, the store query is
//! executed once, and residual predicates are applied to the candidates.
use crate::api::{EvaluationError, EvaluatorConfig};
use crate::execution::residual;
use crate::store::RecordStore;
use crate::types::CatalogRecord;
use segment_compiler::logging::{self, codes, EvaluationContext};
use segment_compiler::pipeline;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Evaluates segment rule sets against a record store
///
/// Stateless between requests; share it across threads behind an `Arc`.
pub struct SegmentEvaluator {
    store: Arc<dyn RecordStore>,
    config: EvaluatorConfig,
}

/// Counters describing one evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationStats {
    pub conditions: usize,
    pub store_clauses: usize,
    pub residuals: usize,
    pub candidates: usize,
    pub matched: usize,
    pub parallel_residuals: bool,
    #[serde(skip)]
    pub duration: Duration,
}

/// Records matching a rule set plus request metadata
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub request_id: String,
    pub records: Vec<CatalogRecord>,
    pub stats: EvaluationStats,
}

impl SegmentEvaluator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_config(store, EvaluatorConfig::default())
    }

    pub fn with_config(store: Arc<dyn RecordStore>, config: EvaluatorConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Records matching every condition in `rules`, in store order
    pub fn evaluate(&self, rules: &str) -> Result<Vec<CatalogRecord>, EvaluationError> {
        self.evaluate_detailed(rules).map(|outcome| outcome.records)
    }

    /// Evaluate under a fresh request id and report statistics
    pub fn evaluate_detailed(&self, rules: &str) -> Result<EvaluationOutcome, EvaluationError> {
        let context = EvaluationContext::generate();
        let request_id = context.request_id.clone();

        logging::with_evaluation_context(context, || {
            let result = self.run(rules, request_id);
            // Rule rejections are already logged by the pipeline
            if let Err(error @ EvaluationError::Store(_)) = &result {
                segment_compiler::log_error!(error.log_code(), "Segment evaluation failed",
                    "error" => error.user_message()
                );
            }
            result
        })
    }

    fn run(&self, rules: &str, request_id: String) -> Result<EvaluationOutcome, EvaluationError> {
        let start_time = Instant::now();

        let processed = pipeline::process_rules(rules)?;
        let filter = &processed.filter;

        let candidates = self.store.find(&filter.store_query)?;
        let candidate_count = candidates.len();
        let parallel_residuals =
            filter.has_residuals() && self.config.runs_parallel(candidate_count);

        segment_compiler::log_debug!("Store query executed",
            "store_query" => &filter.store_query,
            "candidates" => candidate_count,
            "parallel_residuals" => parallel_residuals
        );

        let records = residual::apply_residuals(candidates, &filter.residuals, &self.config);

        let stats = EvaluationStats {
            conditions: processed.conditions.len(),
            store_clauses: filter.store_query.len(),
            residuals: filter.residuals.len(),
            candidates: candidate_count,
            matched: records.len(),
            parallel_residuals,
            duration: start_time.elapsed(),
        };

        segment_compiler::log_success!(codes::success::EVALUATION_COMPLETE, "Segment evaluated",
            "conditions" => stats.conditions,
            "candidates" => stats.candidates,
            "matched" => stats.matched,
            "duration_ms" => format!("{:.3}", stats.duration.as_secs_f64() * 1000.0)
        );

        Ok(EvaluationOutcome {
            request_id,
            records,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, StoreError, StoreResult, UpsertOutcome};
    use assert_matches::assert_matches;
    use segment_compiler::compiler::StoreQuery;
    use segment_compiler::compiler::CompileError;
    use segment_compiler::condition::ParseError;
    use segment_compiler::logging::{LogLevel, LoggingService, MemoryLogger};
    use segment_compiler::pipeline::PipelineError;
    use segment_compiler::policy::PolicyError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn catalog() -> Arc<dyn RecordStore> {
        Arc::new(InMemoryStore::from_records([
            CatalogRecord::new(1, "Budget Phone", "999")
                .with_stock("instock", Some(10))
                .with_category("phones")
                .with_tags(["budget"])
                .with_created_at("2023-06-01T00:00:00.000Z"),
            CatalogRecord::new(2, "Midrange Phone", "1000")
                .with_stock("instock", Some(3))
                .with_category("phones")
                .with_on_sale(true)
                .with_created_at("2024-01-15T00:00:00.000Z"),
            CatalogRecord::new(3, "Flagship Phone", "1500")
                .with_stock("instock", Some(5))
                .with_category("phones")
                .with_tags(["premium", "summer"])
                .with_on_sale(true)
                .with_created_at("2024-03-01T00:00:00.000Z"),
            CatalogRecord::new(4, "Studio Monitor", "2500")
                .with_stock("outofstock", Some(0))
                .with_category("audio")
                .with_tags(["premium"]),
            CatalogRecord::new(5, "Gift Card", ""),
        ]))
    }

    fn evaluator() -> SegmentEvaluator {
        SegmentEvaluator::with_config(catalog(), EvaluatorConfig::sequential())
    }

    fn ids(records: &[CatalogRecord]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_price_residual_boundary() {
        let records = evaluator().evaluate("price > 1000").unwrap();
        assert_eq!(ids(&records), vec![3, 4]);

        let records = evaluator().evaluate("price >= 1000\nprice < 2000").unwrap();
        assert_eq!(ids(&records), vec![2, 3]);
    }

    #[test]
    fn test_conjunction_across_store_and_residuals() {
        let records = evaluator()
            .evaluate("price > 1000\nstock_status = instock\non_sale = true")
            .unwrap();
        assert_eq!(ids(&records), vec![3]);
    }

    #[test]
    fn test_unsatisfiable_conjunction_is_empty_not_error() {
        let records = evaluator()
            .evaluate("stock_status = instock\nstock_status = outofstock")
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_tags_and_dates() {
        let records = evaluator().evaluate("tags = premium\ntags != summer").unwrap();
        assert_eq!(ids(&records), vec![4]);

        let records = evaluator().evaluate("created_at >= 2024-01-01").unwrap();
        assert_eq!(ids(&records), vec![2, 3]);

        let records = evaluator().evaluate("created_at != not-a-date").unwrap();
        assert_eq!(ids(&records), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_not_equal_matches_missing_fields() {
        let records = evaluator().evaluate("category != phones").unwrap();
        assert_eq!(ids(&records), vec![4, 5]);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let evaluator = evaluator();
        let rules = "price > 500\r\n\r\ncategory = phones\n";
        let first = evaluator.evaluate(rules).unwrap();
        let second = evaluator.evaluate(rules).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rule_errors() {
        assert_matches!(
            evaluator().evaluate("  \n\n"),
            Err(EvaluationError::Rules(PipelineError::EmptyRuleSet))
        );
        assert_matches!(
            evaluator().evaluate("on_sale = yes"),
            Err(EvaluationError::Rules(PipelineError::Compile(_)))
        );
        assert_matches!(
            evaluator().evaluate("created_at > not-a-date"),
            Err(EvaluationError::Rules(PipelineError::Compile(_)))
        );

        let error = evaluator().evaluate("colour = red").unwrap_err();
        assert!(error.is_client_error());
        assert!(error.user_message().contains("Allowed fields"));
    }

    #[test]
    fn test_detailed_outcome() {
        let outcome = evaluator()
            .evaluate_detailed("price > 1000\ncategory = phones")
            .unwrap();
        assert_eq!(outcome.request_id.len(), 36);
        assert_eq!(
            outcome.stats,
            EvaluationStats {
                conditions: 2,
                store_clauses: 1,
                residuals: 1,
                candidates: 3,
                matched: 1,
                parallel_residuals: false,
                duration: outcome.stats.duration,
            }
        );
    }

    #[test]
    fn test_parallel_evaluation_preserves_order() {
        let store = InMemoryStore::new();
        for id in 0..2_000u64 {
            store
                .upsert(CatalogRecord::new(id, "bulk", ((id * 13) % 400).to_string()))
                .unwrap();
        }
        let store: Arc<dyn RecordStore> = Arc::new(store);

        let sequential = SegmentEvaluator::with_config(store.clone(), EvaluatorConfig::sequential());
        let parallel = SegmentEvaluator::with_config(
            store,
            EvaluatorConfig::sequential()
                .with_parallel_threshold(100)
                .with_max_threads(4),
        );

        let expected = sequential.evaluate("price <= 200").unwrap();
        let outcome = parallel.evaluate_detailed("price <= 200").unwrap();
        assert!(outcome.stats.parallel_residuals);
        assert_eq!(outcome.records, expected);
    }

    struct UnavailableStore;

    impl RecordStore for UnavailableStore {
        fn find(&self, _query: &StoreQuery) -> StoreResult<Vec<CatalogRecord>> {
            Err(StoreError::unavailable("connection refused"))
        }

        fn upsert(&self, _record: CatalogRecord) -> StoreResult<UpsertOutcome> {
            Err(StoreError::unavailable("connection refused"))
        }

        fn len(&self) -> StoreResult<usize> {
            Err(StoreError::unavailable("connection refused"))
        }
    }

    #[test]
    fn test_store_failure_propagates() {
        let evaluator = SegmentEvaluator::new(Arc::new(UnavailableStore));
        let error = evaluator.evaluate("on_sale = true").unwrap_err();
        assert_matches!(error, EvaluationError::Store(StoreError::Unavailable { .. }));
    }

    /// Delegates to an in-memory store and counts queries
    struct CountingStore {
        inner: InMemoryStore,
        finds: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryStore::from_records([CatalogRecord::new(1, "Mug", "9.50")]),
                finds: AtomicUsize::new(0),
            }
        }

        fn finds(&self) -> usize {
            self.finds.load(Ordering::SeqCst)
        }
    }

    impl RecordStore for CountingStore {
        fn find(&self, query: &StoreQuery) -> StoreResult<Vec<CatalogRecord>> {
            self.finds.fetch_add(1, Ordering::SeqCst);
            self.inner.find(query)
        }

        fn upsert(&self, record: CatalogRecord) -> StoreResult<UpsertOutcome> {
            self.inner.upsert(record)
        }

        fn len(&self) -> StoreResult<usize> {
            self.inner.len()
        }
    }

    #[test]
    fn test_rejected_rules_never_reach_the_store() {
        let store = Arc::new(CountingStore::new());
        let evaluator = SegmentEvaluator::new(store.clone());

        assert_matches!(
            evaluator.evaluate("foo = bar"),
            Err(EvaluationError::Rules(PipelineError::Compile(CompileError::Rejected {
                source: PolicyError::UnknownField { .. },
                ..
            })))
        );
        assert_matches!(
            evaluator.evaluate("price 10"),
            Err(EvaluationError::Rules(PipelineError::Parse(ParseError::NoOperator { .. })))
        );
        assert_matches!(
            evaluator.evaluate("on_sale = yes"),
            Err(EvaluationError::Rules(PipelineError::Compile(CompileError::Rejected {
                source: PolicyError::TypeCoercion { .. },
                ..
            })))
        );
        assert_eq!(store.finds(), 0);

        evaluator.evaluate("price < 10").unwrap();
        assert_eq!(store.finds(), 1);
    }

    #[test]
    fn test_rejected_rules_are_logged_once() {
        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
        if logging::init_global_logging_with_service(service).is_err() {
            // global logger already installed in this process
            return;
        }

        let _ = evaluator().evaluate("shelf_location = aisle-9");

        let rejections = memory
            .get_errors()
            .into_iter()
            .filter(|event| {
                event
                    .context
                    .values()
                    .any(|value| value.contains("shelf_location"))
            })
            .count();
        assert_eq!(rejections, 1);
    }

    #[test]
    fn test_evaluator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SegmentEvaluator>();
    }
}
