//! Centralized constants for the q-audit crate
//!
//! Limits and statistical defaults shared by the mapper, the test battery
//! and the aggregator.

/// Bit-width limits
pub mod width {
    /// Widest symbol the mapper accepts (2^63 - 1 still fits in a u64)
    pub const MAX_BIT_WIDTH: u32 = 63;

    /// Widest symbol whose full value space may be enumerated
    pub const MAX_ENUMERABLE_WIDTH: u32 = 24;

    /// Longest window the pattern test will tally (2^20 cells)
    pub const MAX_PATTERN_LENGTH: usize = 20;
}

/// Statistical defaults
pub mod stats {
    /// Significance level for the monobit frequency test
    pub const FREQUENCY_SIGNIFICANCE: f64 = 0.01;

    /// Significance level for the overlapping pattern test
    pub const PATTERN_SIGNIFICANCE: f64 = 0.05;

    /// Shortest window length tested by default
    pub const PATTERN_MIN_LENGTH: usize = 2;

    /// Longest window length tested by default
    pub const PATTERN_MAX_LENGTH: usize = 6;
}

/// Run log settings
pub mod log {
    /// Default run log file name
    pub const RUN_LOG_FILE: &str = "measurement_log.jsonl";
}
