//! Overlapping pattern (serial) chi-square test
//!
//! For each window length L a window slides across the sequence with
//! stride 1, giving `n - L + 1` overlapping windows. Under uniform
//! randomness every one of the `2^L` patterns is expected
//! `(n - L + 1) / 2^L` times. The chi-square statistic over all patterns is
//! compared against a chi-square distribution with `2^L - 1` degrees of
//! freedom.
//!
//! Adjacent windows share bits, so this detects short-range structure
//! rather than testing independence.

use crate::bitstring::Bitstring;
use crate::constants::width::MAX_PATTERN_LENGTH;
use crate::entropy::TestResult;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::collections::BTreeMap;

/// Result for one window length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternResult {
    #[serde(flatten)]
    pub result: TestResult,

    /// Occurrences of every L-bit pattern, unobserved patterns included
    pub counts: BTreeMap<String, u64>,
}

/// Window length -> result
pub type PatternReport = BTreeMap<usize, PatternResult>;

/// Run the pattern test for every length in `[min_length, max_length]`
pub fn pattern_test(
    bits: &Bitstring,
    min_length: usize,
    max_length: usize,
    significance: f64,
) -> Result<PatternReport> {
    if min_length == 0 {
        return Err(Error::Domain(
            "Pattern length must be at least 1".to_string(),
        ));
    }
    if min_length > max_length {
        return Err(Error::Domain(format!(
            "Minimum pattern length {} exceeds maximum {}",
            min_length, max_length
        )));
    }
    if max_length > MAX_PATTERN_LENGTH {
        return Err(Error::Domain(format!(
            "Pattern length {} exceeds maximum of {}",
            max_length, MAX_PATTERN_LENGTH
        )));
    }

    (min_length..=max_length)
        .map(|length| Ok((length, test_length(bits, length, significance)?)))
        .collect()
}

fn test_length(bits: &Bitstring, length: usize, significance: f64) -> Result<PatternResult> {
    let n = bits.len();
    if n < length {
        return Err(Error::Domain(format!(
            "Pattern length {} exceeds bitstring length {}",
            length, n
        )));
    }

    let tally = tally_windows(bits.bits(), length);
    let total_windows = (n - length + 1) as f64;
    let num_patterns = tally.len();
    let expected = total_windows / num_patterns as f64;

    let chi2: f64 = tally
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();

    let df = (num_patterns - 1) as u64;
    let dist = ChiSquared::new(df as f64)
        .map_err(|e| Error::Domain(format!("Invalid chi-square distribution: {}", e)))?;
    let p_value = dist.sf(chi2);

    let counts = tally
        .iter()
        .enumerate()
        .map(|(pattern, &count)| (format!("{:0width$b}", pattern, width = length), count))
        .collect();

    Ok(PatternResult {
        result: TestResult::new(chi2, Some(df), p_value, significance),
        counts,
    })
}

/// Count every overlapping window, indexed by its value read MSB first
fn tally_windows(bits: &[u8], length: usize) -> Vec<u64> {
    let mask = (1usize << length) - 1;
    let mut tally = vec![0u64; 1 << length];
    let mut window = 0usize;

    for (i, &bit) in bits.iter().enumerate() {
        window = ((window << 1) | bit as usize) & mask;
        if i + 1 >= length {
            tally[window] += 1;
        }
    }
    tally
}
