//! # Evaluator Configuration

use segment_compiler::config::compile_time::evaluation::MAX_RESIDUAL_THREADS;
use segment_compiler::config::EvaluationPreferences;

/// Configuration for the segment evaluator
///
/// Controls when residual filtering is split across worker threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Candidate count at which residual filtering goes parallel
    pub parallel_residual_threshold: usize,

    /// Worker threads for parallel residual filtering (1 disables it)
    pub max_residual_threads: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self::from_preferences(&EvaluationPreferences::default())
    }
}

impl EvaluatorConfig {
    /// Build from runtime preferences (environment or TOML file)
    pub fn from_preferences(preferences: &EvaluationPreferences) -> Self {
        Self {
            parallel_residual_threshold: preferences.parallel_residual_threshold,
            max_residual_threads: preferences.max_residual_threads.clamp(1, MAX_RESIDUAL_THREADS),
        }
    }

    /// Always filter on the calling thread
    pub fn sequential() -> Self {
        Self {
            parallel_residual_threshold: usize::MAX,
            max_residual_threads: 1,
        }
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_residual_threshold = threshold;
        self
    }

    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_residual_threads = max_threads.clamp(1, MAX_RESIDUAL_THREADS);
        self
    }

    /// Whether `candidates` records would be filtered in parallel
    pub fn runs_parallel(&self, candidates: usize) -> bool {
        self.max_residual_threads > 1
            && candidates > 1
            && candidates >= self.parallel_residual_threshold
    }
}
