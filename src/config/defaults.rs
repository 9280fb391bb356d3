//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{log, stats};

/// Default entropy source
pub const DEFAULT_SOURCE: &str = "superposition";

/// Default number of samples drawn per source
pub const DEFAULT_SAMPLES: usize = 1024;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default RNG seed (0 means draw from OS entropy)
pub const DEFAULT_SEED: u64 = 0;

/// Default symbol width in bits
pub const DEFAULT_BIT_WIDTH: u32 = 4;

/// Default lower bound of the mapped range
pub const DEFAULT_RANGE_MIN: i64 = 10;

/// Default upper bound of the mapped range
pub const DEFAULT_RANGE_MAX: i64 = 20;

/// Default significance for the frequency test
pub const DEFAULT_FREQUENCY_SIGNIFICANCE: f64 = stats::FREQUENCY_SIGNIFICANCE;

/// Default significance for the pattern test
pub const DEFAULT_PATTERN_SIGNIFICANCE: f64 = stats::PATTERN_SIGNIFICANCE;

/// Default shortest pattern length
pub const DEFAULT_PATTERN_MIN_LENGTH: usize = stats::PATTERN_MIN_LENGTH;

/// Default longest pattern length
pub const DEFAULT_PATTERN_MAX_LENGTH: usize = stats::PATTERN_MAX_LENGTH;

/// Default number of uniformity trials
pub const DEFAULT_TRIALS: usize = 50;

/// Default shots per uniformity trial
pub const DEFAULT_SHOTS: usize = 1024;

/// Default relative-error tolerance per mapped value
pub const DEFAULT_TOLERANCE: f64 = 0.4;

/// Default number of trials run concurrently
pub const DEFAULT_WORKERS: usize = 4;

/// Whether trial outcomes are appended to the run log by default
pub const DEFAULT_LOG_ENABLED: bool = false;

/// Default run log file name (under the data directory)
pub const DEFAULT_LOG_FILE: &str = log::RUN_LOG_FILE;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "q-audit";
