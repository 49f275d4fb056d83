pub mod compile_time {
    pub mod rules {
        /// Maximum size of a rule text submission (64KB)
        /// SECURITY: Bounds the work done before any store access
        pub const MAX_RULE_TEXT_BYTES: usize = 64 * 1024;

        /// Maximum length of a single condition line
        /// SECURITY: Prevents pathological operator scans
        pub const MAX_RULE_LINE_LENGTH: usize = 1024;

        /// Maximum number of conditions in one rule set
        /// PERFORMANCE: Each condition becomes one store clause or residual pass
        pub const MAX_CONDITIONS: usize = 256;
    }

    pub mod evaluation {
        /// Candidate count at which residual filtering is split across threads
        /// PERFORMANCE: Below this the spawn cost outweighs the parallel gain
        pub const DEFAULT_PARALLEL_RESIDUAL_THRESHOLD: usize = 10_000;

        /// Upper bound on residual filtering worker threads
        /// RESOURCE: Caps thread usage per evaluation request
        pub const MAX_RESIDUAL_THREADS: usize = 8;
    }

    pub mod logging {
        /// Maximum length of a context value written to a log event
        /// RESOURCE: Rule lines are echoed into logs
        pub const MAX_LOG_CONTEXT_VALUE_LENGTH: usize = 256;
    }
}
