//! Randomness testing
//!
//! Statistical tests for bit sequences drawn from an entropy source:
//! - Frequency (monobit): are 0s and 1s balanced?
//! - Pattern (overlapping serial chi-square): are all L-bit windows equally common?

pub mod frequency;
pub mod pattern;

pub use frequency::{frequency_test, monobit_p_value};
pub use pattern::{pattern_test, PatternReport, PatternResult};

use crate::bitstring::{BitOrder, Bitstring};
use crate::constants::stats::*;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Outcome of a single statistical test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test statistic (s_obs for monobit, chi-square for patterns)
    pub statistic: f64,

    /// Degrees of freedom (pattern test only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degrees_of_freedom: Option<u64>,

    /// Probability of a statistic at least this extreme under the null
    /// hypothesis of uniform randomness
    pub p_value: f64,

    /// True when `p_value` fell below the significance level
    pub non_random: bool,
}

impl TestResult {
    pub(crate) fn new(
        statistic: f64,
        degrees_of_freedom: Option<u64>,
        p_value: f64,
        significance: f64,
    ) -> Self {
        Self {
            statistic,
            degrees_of_freedom,
            p_value,
            non_random: p_value < significance,
        }
    }
}

/// Parameters for [`run_all_tests`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSettings {
    pub frequency_significance: f64,
    pub pattern_significance: f64,
    pub pattern_min_length: usize,
    pub pattern_max_length: usize,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            frequency_significance: FREQUENCY_SIGNIFICANCE,
            pattern_significance: PATTERN_SIGNIFICANCE,
            pattern_min_length: PATTERN_MIN_LENGTH,
            pattern_max_length: PATTERN_MAX_LENGTH,
        }
    }
}

/// Results of the full test battery on one bitstring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomnessReport {
    /// Number of bits analyzed
    pub total_bits: usize,
    pub ones: usize,
    pub zeros: usize,

    /// Whether the bits were in draw order or rebuilt from counts
    pub bit_order: BitOrder,

    pub frequency: TestResult,

    /// Pattern test result per window length
    pub patterns: PatternReport,
}

impl RandomnessReport {
    /// True when no test flagged the sequence as non-random
    pub fn all_passed(&self) -> bool {
        !self.frequency.non_random && self.patterns.values().all(|p| !p.result.non_random)
    }
}

/// Run the frequency and pattern tests on `bits`
pub fn run_all_tests(bits: &Bitstring, settings: &TestSettings) -> Result<RandomnessReport> {
    let frequency = frequency_test(bits, settings.frequency_significance)?;
    let patterns = pattern_test(
        bits,
        settings.pattern_min_length,
        settings.pattern_max_length,
        settings.pattern_significance,
    )?;

    Ok(RandomnessReport {
        total_bits: bits.len(),
        ones: bits.ones(),
        zeros: bits.zeros(),
        bit_order: bits.order(),
        frequency,
        patterns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::pseudo::SeededPseudoSource;
    use crate::source::EntropySource;

    #[test]
    fn test_run_all_tests_good_data() {
        let source = SeededPseudoSource::new(1, 42);
        let bits = source.draw_bitstring(10_000).unwrap();

        let report = run_all_tests(&bits, &TestSettings::default()).unwrap();

        assert_eq!(report.total_bits, 10_000);
        assert_eq!(report.ones + report.zeros, 10_000);
        assert_eq!(report.bit_order, BitOrder::Temporal);
        assert_eq!(report.patterns.len(), 5);
        assert!(report.frequency.p_value > 0.001);
    }

    #[test]
    fn test_run_all_tests_bad_data() {
        let bits: Bitstring = "0000".repeat(256).parse().unwrap();
        let report = run_all_tests(&bits, &TestSettings::default()).unwrap();

        assert!(report.frequency.non_random);
        assert!(report.patterns.values().all(|p| p.result.non_random));
        assert!(!report.all_passed());
    }

    #[test]
    fn test_run_all_tests_too_short() {
        let bits: Bitstring = "0101".parse().unwrap();
        assert!(run_all_tests(&bits, &TestSettings::default()).is_err());
    }
}
