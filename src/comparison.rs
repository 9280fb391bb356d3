//! Side-by-side randomness comparison of entropy sources
//!
//! Draws the same number of samples from each source, runs the full test
//! battery on each, and collects the results into one report. Because every
//! source honors the same `EntropySource` contract, a simulated-quantum
//! source and a pseudorandom one are handled identically.

use crate::entropy::{run_all_tests, RandomnessReport, TestSettings};
use crate::error::Result;
use crate::source::EntropySource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Test results for one source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    /// Source name
    pub source: String,
    /// Source description
    pub description: String,

    /// Frequency and pattern results
    pub tests: RandomnessReport,

    /// The tested bits, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitstring: Option<String>,
}

/// Results for every compared source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Unique report ID
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Samples drawn from each source
    pub samples: usize,
    pub settings: TestSettings,
    pub sources: Vec<SourceReport>,
}

impl ComparisonReport {
    /// Look up a source's results by name
    pub fn get(&self, source: &str) -> Option<&SourceReport> {
        self.sources.iter().find(|s| s.source == source)
    }
}

/// Draw `samples` from one source and run the test battery
pub fn analyze_source(
    source: &dyn EntropySource,
    samples: usize,
    settings: &TestSettings,
    include_bits: bool,
) -> Result<SourceReport> {
    let bits = source.draw_bitstring(samples)?;
    let tests = run_all_tests(&bits, settings)?;

    info!(
        source = source.name(),
        bits = bits.len(),
        order = %bits.order(),
        frequency_p = tests.frequency.p_value,
        "source analyzed"
    );

    Ok(SourceReport {
        source: source.name().to_string(),
        description: source.description().to_string(),
        tests,
        bitstring: include_bits.then(|| bits.to_string()),
    })
}

/// Analyze every source with the same sample count and settings
pub fn compare_sources(
    sources: &[&dyn EntropySource],
    samples: usize,
    settings: &TestSettings,
    include_bits: bool,
) -> Result<ComparisonReport> {
    let reports = sources
        .iter()
        .map(|source| analyze_source(*source, samples, settings, include_bits))
        .collect::<Result<Vec<_>>>()?;

    Ok(ComparisonReport {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        samples,
        settings: settings.clone(),
        sources: reports,
    })
}
