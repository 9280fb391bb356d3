//! Distribution aggregation across repeated trials
//!
//! Each trial's outcome table is mapped onto `[min, max]` and the mapped
//! counts are summed over all trials. The resulting observed distribution is
//! compared against the expected distribution obtained by mapping every
//! possible `width`-bit value exactly once.

pub mod trials;

pub use trials::{
    check_uniformity, evaluate_uniformity, run_trials, TrialOutcome, UniformityReport,
    UniformitySettings,
};

use crate::constants::width::MAX_ENUMERABLE_WIDTH;
use crate::counts::{MappedCounts, OutcomeCounts};
use crate::error::{Error, Result};
use crate::mapper::{counts_to_range, max_value, to_range};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

/// Mapped value -> probability
pub type Distribution = BTreeMap<i64, f64>;

/// Observed vs expected probability for one mapped value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub value: i64,
    pub observed: f64,
    pub expected: f64,
    pub relative_error: f64,
}

/// Probability of each mapped value if every `width`-bit value is equally likely
pub fn expected_distribution(width: u32, min: i64, max: i64) -> Result<Distribution> {
    if width > MAX_ENUMERABLE_WIDTH {
        return Err(Error::Domain(format!(
            "Cannot enumerate {}-bit values (maximum {})",
            width, MAX_ENUMERABLE_WIDTH
        )));
    }
    let max_possible = max_value(width)?;

    let mut counts = MappedCounts::new();
    for d in 0..=max_possible {
        *counts.entry(to_range(d, width, min, max)?).or_insert(0) += 1;
    }

    let total = (max_possible + 1) as f64;
    Ok(counts
        .into_iter()
        .map(|(value, count)| (value, count as f64 / total))
        .collect())
}

/// Memoized expected distributions keyed by `(width, min, max)`
///
/// Entries are computed on first use and never invalidated.
#[derive(Debug, Default)]
pub struct ExpectedCache {
    entries: RwLock<HashMap<(u32, i64, i64), Arc<Distribution>>>,
}

impl ExpectedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (computing if needed) the expected distribution
    pub fn get(&self, width: u32, min: i64, max: i64) -> Result<Arc<Distribution>> {
        let key = (width, min, max);
        if let Some(found) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(found));
        }

        let computed = Arc::new(expected_distribution(width, min, max)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key).or_insert(computed)))
    }

    /// Number of cached distributions
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Running sum of mapped counts over any number of trials
///
/// Merging is commutative and associative, so trials may be added in any
/// order or accumulated on separate workers and merged afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionAggregator {
    width: u32,
    min: i64,
    max: i64,
    counts: MappedCounts,
    samples: u64,
    trials: usize,
}

impl DistributionAggregator {
    pub fn new(width: u32, min: i64, max: i64) -> Self {
        Self {
            width,
            min,
            max,
            counts: MappedCounts::new(),
            samples: 0,
            trials: 0,
        }
    }

    /// Map one trial onto the range and add its counts
    pub fn add_trial(&mut self, trial: &OutcomeCounts) -> Result<()> {
        let mapped = counts_to_range(trial, self.width, self.min, self.max)?;
        self.samples = checked_samples(self.samples, trial.total())?;
        for (value, count) in mapped {
            *self.counts.entry(value).or_insert(0) += count;
        }
        self.trials += 1;
        Ok(())
    }

    /// Fold another aggregator with the same parameters into this one
    pub fn merge(&mut self, other: &DistributionAggregator) -> Result<()> {
        if (self.width, self.min, self.max) != (other.width, other.min, other.max) {
            return Err(Error::Domain(format!(
                "Cannot merge aggregators over ({}, {}, {}) and ({}, {}, {})",
                self.width, self.min, self.max, other.width, other.min, other.max
            )));
        }
        self.samples = checked_samples(self.samples, other.samples)?;
        for (value, count) in &other.counts {
            *self.counts.entry(*value).or_insert(0) += count;
        }
        self.trials += other.trials;
        Ok(())
    }

    /// Summed mapped counts
    pub fn counts(&self) -> &MappedCounts {
        &self.counts
    }

    /// Total samples over all trials
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Observed probability of each mapped value
    pub fn distribution(&self) -> Result<Distribution> {
        if self.samples == 0 {
            return Err(Error::Domain(
                "No samples to build a distribution from".to_string(),
            ));
        }
        let total = self.samples as f64;
        Ok(self
            .counts
            .iter()
            .map(|(value, count)| (*value, *count as f64 / total))
            .collect())
    }
}

fn checked_samples(samples: u64, added: u64) -> Result<u64> {
    samples
        .checked_add(added)
        .ok_or_else(|| Error::Domain("Aggregated sample count overflows 64 bits".to_string()))
}

/// Observed distribution of mapped values over independent trials
pub fn observe(trials: &[OutcomeCounts], width: u32, min: i64, max: i64) -> Result<Distribution> {
    let mut aggregator = DistributionAggregator::new(width, min, max);
    for trial in trials {
        aggregator.add_trial(trial)?;
    }
    aggregator.distribution()
}

/// Relative error of every expected value, in ascending value order
///
/// A value missing from `observed` counts as probability 0.
pub fn deviations(observed: &Distribution, expected: &Distribution) -> Vec<Deviation> {
    expected
        .iter()
        .map(|(value, expected_prob)| {
            let observed_prob = observed.get(value).copied().unwrap_or(0.0);
            let denominator = if *expected_prob != 0.0 { *expected_prob } else { 1.0 };
            Deviation {
                value: *value,
                observed: observed_prob,
                expected: *expected_prob,
                relative_error: (observed_prob - expected_prob).abs() / denominator,
            }
        })
        .collect()
}

/// Check every expected value is observed within `tolerance` relative error
///
/// Fails on the first (lowest) value that exceeds it.
pub fn compare(
    observed: &Distribution,
    expected: &Distribution,
    tolerance: f64,
) -> Result<Vec<Deviation>> {
    let deviations = deviations(observed, expected);
    if let Some(d) = deviations.iter().find(|d| d.relative_error > tolerance) {
        return Err(Error::ToleranceExceeded {
            value: d.value,
            observed: d.observed,
            expected: d.expected,
            relative_error: d.relative_error,
            tolerance,
        });
    }
    Ok(deviations)
}
