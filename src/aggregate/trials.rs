//! Repeated-trial uniformity checks
//!
//! Trials are independent and stateless, so they are dispatched to tokio's
//! blocking pool (bounded by a semaphore) and merged in completion order.

use crate::aggregate::{compare, deviations, Deviation, Distribution, DistributionAggregator, ExpectedCache};
use crate::counts::OutcomeCounts;
use crate::error::{Error, Result};
use crate::mapper::validate_mapped;
use crate::source::EntropySource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Parameters for a uniformity check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformitySettings {
    /// Width of each drawn symbol
    pub bit_width: u32,
    pub min: i64,
    pub max: i64,
    /// Number of independent trials
    pub trials: usize,
    /// Samples drawn per trial
    pub shots: usize,
    /// Maximum allowed relative error per mapped value
    pub tolerance: f64,
    /// Trials allowed to run at once
    pub workers: usize,
}

impl Default for UniformitySettings {
    fn default() -> Self {
        use crate::config::defaults::*;
        Self {
            bit_width: DEFAULT_BIT_WIDTH,
            min: DEFAULT_RANGE_MIN,
            max: DEFAULT_RANGE_MAX,
            trials: DEFAULT_TRIALS,
            shots: DEFAULT_SHOTS,
            tolerance: DEFAULT_TOLERANCE,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// One trial's outcome table, tagged with its dispatch index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub trial: usize,
    pub counts: OutcomeCounts,
}

/// Result of aggregating many trials against the expected distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniformityReport {
    /// Unique report ID
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Source name
    pub source: String,
    pub settings: UniformitySettings,
    /// Total samples aggregated
    pub samples: u64,
    pub observed: Distribution,
    pub expected: Distribution,
    /// Per-value relative errors, ascending by value
    pub deviations: Vec<Deviation>,
    pub passed: bool,
    /// Description of the first value outside tolerance, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl UniformityReport {
    /// Turn a failed check back into its `ToleranceExceeded` error
    pub fn ensure_passed(&self) -> Result<()> {
        compare(&self.observed, &self.expected, self.settings.tolerance).map(|_| ())
    }
}

/// Draw `trials` independent tables of `shots` samples each
///
/// At most `workers` draws run at the same time. Results come back in
/// completion order; each carries its dispatch index. A table that does not
/// sum to `shots` is rejected.
pub async fn run_trials(
    source: Arc<dyn EntropySource>,
    trials: usize,
    shots: usize,
    workers: usize,
) -> Result<Vec<TrialOutcome>> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut set = JoinSet::new();

    for trial in 0..trials {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| Error::Source(format!("Worker pool closed: {}", e)))?;
        let source = Arc::clone(&source);
        set.spawn_blocking(move || {
            let _permit = permit;
            source.draw(shots).map(|counts| TrialOutcome { trial, counts })
        });
    }

    let mut outcomes = Vec::with_capacity(trials);
    while let Some(joined) = set.join_next().await {
        let outcome =
            joined.map_err(|e| Error::Source(format!("Trial worker failed: {}", e)))??;
        if outcome.counts.total() != shots as u64 {
            return Err(Error::Source(format!(
                "Trial {} returned {} samples, {} requested",
                outcome.trial,
                outcome.counts.total(),
                shots
            )));
        }
        debug!(trial = outcome.trial, "trial complete");
        outcomes.push(outcome);
    }

    info!(trials, shots, workers, "all trials complete");
    Ok(outcomes)
}

/// Aggregate finished trials and compare against the expected distribution
pub fn evaluate_uniformity(
    source: &str,
    outcomes: &[TrialOutcome],
    settings: &UniformitySettings,
    cache: &ExpectedCache,
) -> Result<UniformityReport> {
    let expected = cache.get(settings.bit_width, settings.min, settings.max)?;

    let mut aggregator = DistributionAggregator::new(settings.bit_width, settings.min, settings.max);
    for outcome in outcomes {
        aggregator.add_trial(&outcome.counts)?;
    }
    validate_mapped(aggregator.counts(), settings.min, settings.max)?;
    let observed = aggregator.distribution()?;

    let (passed, failure) = match compare(&observed, &expected, settings.tolerance) {
        Ok(_) => (true, None),
        Err(e @ Error::ToleranceExceeded { .. }) => {
            warn!(source, "{}", e);
            (false, Some(e.to_string()))
        }
        Err(e) => return Err(e),
    };

    Ok(UniformityReport {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        source: source.to_string(),
        settings: settings.clone(),
        samples: aggregator.samples(),
        deviations: deviations(&observed, &expected),
        observed,
        expected: (*expected).clone(),
        passed,
        failure,
    })
}

/// Run all trials on `source` and evaluate them
pub async fn check_uniformity(
    source: Arc<dyn EntropySource>,
    settings: &UniformitySettings,
    cache: &ExpectedCache,
) -> Result<UniformityReport> {
    if source.width() != settings.bit_width {
        return Err(Error::Domain(format!(
            "Source draws {}-bit symbols but the check expects {} bits",
            source.width(),
            settings.bit_width
        )));
    }
    // Fail on bad parameters before spending any draws
    cache.get(settings.bit_width, settings.min, settings.max)?;

    let name = source.name();
    let outcomes = run_trials(source, settings.trials, settings.shots, settings.workers).await?;
    evaluate_uniformity(name, &outcomes, settings, cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::expected_distribution;
    use crate::source::fixed::FixedSource;
    use crate::source::pseudo::SeededPseudoSource;
    use crate::source::superposition::SuperpositionSource;

    fn balanced_4_bit(per_value: u64) -> OutcomeCounts {
        OutcomeCounts::from_pairs(
            (0..16u64).map(|d| (crate::mapper::to_binary_string(d, 4).unwrap(), per_value)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_trials_collects_every_trial() {
        let source: Arc<dyn EntropySource> = Arc::new(SeededPseudoSource::new(4, 3));
        let outcomes = run_trials(source, 12, 256, 3).await.unwrap();

        assert_eq!(outcomes.len(), 12);
        let mut indices: Vec<usize> = outcomes.iter().map(|o| o.trial).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..12).collect::<Vec<_>>());
        assert!(outcomes.iter().all(|o| o.counts.total() == 256));
    }

    #[tokio::test]
    async fn test_run_trials_propagates_source_errors() {
        let source: Arc<dyn EntropySource> =
            Arc::new(FixedSource::new(balanced_4_bit(64)).unwrap());
        // Fixed table holds 1024 samples
        assert!(run_trials(Arc::clone(&source), 2, 1024, 2).await.is_ok());
        assert!(run_trials(source, 2, 100, 2).await.is_err());
    }

    #[tokio::test]
    async fn test_stubbed_balanced_trials_pass() {
        // 50 trials of a perfectly balanced 4-bit table
        let source: Arc<dyn EntropySource> =
            Arc::new(FixedSource::new(balanced_4_bit(64)).unwrap());
        let settings = UniformitySettings {
            trials: 50,
            shots: 1024,
            ..UniformitySettings::default()
        };
        let cache = ExpectedCache::new();

        let report = check_uniformity(source, &settings, &cache).await.unwrap();

        assert!(report.passed);
        assert!(report.failure.is_none());
        assert_eq!(report.samples, 50 * 1024);
        assert_eq!(report.observed.len(), report.expected.len());
        assert!(report.ensure_passed().is_ok());

        let expected = expected_distribution(4, 10, 20).unwrap();
        assert_eq!(report.expected, expected);
    }

    #[tokio::test]
    async fn test_simulated_superposition_passes() {
        let source: Arc<dyn EntropySource> =
            Arc::new(SuperpositionSource::uniform(4).unwrap().with_seed(2024));
        let cache = ExpectedCache::new();

        let report = check_uniformity(source, &UniformitySettings::default(), &cache)
            .await
            .unwrap();

        assert_eq!(report.source, "superposition");
        assert!(report.passed, "unexpected failure: {:?}", report.failure);
    }

    #[tokio::test]
    async fn test_biased_source_fails() {
        // Every shot measures "0000", which maps to 10
        let source: Arc<dyn EntropySource> =
            Arc::new(SuperpositionSource::from_initial_state("0000").unwrap());
        let settings = UniformitySettings {
            trials: 5,
            shots: 100,
            ..UniformitySettings::default()
        };
        let cache = ExpectedCache::new();

        let report = check_uniformity(source, &settings, &cache).await.unwrap();

        assert!(!report.passed);
        assert!(report.failure.is_some());
        match report.ensure_passed() {
            Err(Error::ToleranceExceeded { value, .. }) => assert_eq!(value, 10),
            other => panic!("Expected tolerance error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_width_mismatch() {
        let source: Arc<dyn EntropySource> = Arc::new(SeededPseudoSource::new(3, 1));
        let cache = ExpectedCache::new();
        let result = check_uniformity(source, &UniformitySettings::default(), &cache).await;
        assert!(matches!(result, Err(Error::Domain(_))));
    }
}
