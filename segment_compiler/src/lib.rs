// Internal modules
pub mod compiler;
pub mod condition;
pub mod config;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod policy;

// Re-export key types for library consumers
pub use compiler::{
    compile, CompileError, CompiledFilter, FieldPredicate, ResidualPredicate, StoreClause,
    StoreQuery, StoreValue,
};
pub use condition::{parse_condition, Comparison, Condition, ConditionValue, Operator, ParseError};
pub use config::{ConfigError, RuntimeConfig};
pub use pipeline::{process_rules, PipelineError, PipelineResult, ProcessedRules};
pub use policy::{Field, FieldType, PolicyError};
