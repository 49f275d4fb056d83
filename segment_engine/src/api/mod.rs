//! # Public API for segment evaluation
//!
//! Configuration, the error type callers see, and the response envelope.
pub mod config;
pub mod errors;
pub mod response;
pub mod service;

pub use config::EvaluatorConfig;
pub use errors::EvaluationError;
pub use response::SegmentResponse;
pub use service::SegmentService;
