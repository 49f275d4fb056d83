pub mod engine;
pub mod residual;

pub use engine::{EvaluationOutcome, EvaluationStats, SegmentEvaluator};
pub use residual::{apply_residuals, satisfies_all};
