//! q-audit: Randomness auditor for quantum and pseudorandom bit sources
//!
//! A library and CLI tool for drawing bits from a simulated superposition
//! source or a classical PRNG, testing them for statistical randomness, and
//! checking that mapped integer values come out uniformly over many trials.
//!
//! ## Features
//!
//! - Bitstring to decimal to integer-range mapping
//! - Monobit frequency test and overlapping pattern (serial) chi-square test
//! - Interchangeable entropy sources (simulated superposition, pseudo, replay)
//! - Repeated-trial uniformity checks against the exact expected distribution
//! - Text and JSON reports, JSON-lines run log
//!
//! ## Quick Start
//!
//! ```rust
//! use q_audit::entropy::{run_all_tests, TestSettings};
//! use q_audit::mapper::{to_decimal, to_range};
//! use q_audit::source::pseudo::SeededPseudoSource;
//! use q_audit::source::EntropySource;
//!
//! // Map a 4-bit outcome onto [10, 20]
//! let decimal = to_decimal("0111", 4).unwrap();
//! assert_eq!(to_range(decimal, 4, 10, 20).unwrap(), 15);
//!
//! // Test 1024 pseudo-random bits
//! let source = SeededPseudoSource::new(1, 42);
//! let bits = source.draw_bitstring(1024).unwrap();
//! let report = run_all_tests(&bits, &TestSettings::default()).unwrap();
//! println!("Frequency p-value: {:.4}", report.frequency.p_value);
//! ```

pub mod aggregate;
pub mod bitstring;
pub mod cli;
pub mod comparison;
pub mod config;
pub mod constants;
pub mod counts;
pub mod entropy;
pub mod error;
pub mod format;
pub mod mapper;
pub mod runlog;
pub mod source;

// Re-export commonly used types
pub use aggregate::{DistributionAggregator, UniformityReport, UniformitySettings};
pub use bitstring::{BitOrder, Bitstring};
pub use comparison::ComparisonReport;
pub use config::Config;
pub use counts::OutcomeCounts;
pub use entropy::{RandomnessReport, TestResult, TestSettings};
pub use error::{Error, Result};
pub use source::EntropySource;
