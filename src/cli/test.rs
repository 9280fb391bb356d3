//! Test command handler
//!
//! Runs the frequency and pattern tests on a single source, a literal
//! bitstring, or a recorded outcome table.

use crate::bitstring::Bitstring;
use crate::comparison::{analyze_source, ComparisonReport, SourceReport};
use crate::config::Config;
use crate::counts::OutcomeCounts;
use crate::entropy::run_all_tests;
use crate::error::{Error, Result};
use crate::source::fixed::FixedSource;
use crate::source::get_source;
use chrono::Utc;
use clap::Args;

/// Test command arguments
#[derive(Args)]
pub struct TestArgs {
    /// Entropy source to draw from
    #[arg(long, short = 's', conflicts_with_all = ["bits", "counts"])]
    pub source: Option<String>,

    /// Literal bitstring to test, in draw order
    #[arg(long, conflicts_with = "counts")]
    pub bits: Option<String>,

    /// JSON outcome table to test (order is rebuilt from counts)
    #[arg(long, short = 'c')]
    pub counts: Option<String>,

    /// Number of symbols to draw
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Bit width of each drawn symbol
    #[arg(long, short = 'w', default_value = "1")]
    pub width: u32,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Include the tested bits in the report
    #[arg(long)]
    pub include_bits: bool,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

/// Run the test command
pub fn run(args: TestArgs) -> Result<()> {
    let config = Config::load()?;
    let settings = config.test_settings();
    let format = args.format.unwrap_or(config.defaults.format.clone());
    let formatter = super::formatter(&format)?;

    let (samples, report) = if let Some(bits) = &args.bits {
        let bits: Bitstring = bits.parse()?;
        let tests = run_all_tests(&bits, &settings)?;
        let report = SourceReport {
            source: "input".to_string(),
            description: "Bits given on the command line".to_string(),
            tests,
            bitstring: args.include_bits.then(|| bits.to_string()),
        };
        (bits.len(), report)
    } else if let Some(counts) = &args.counts {
        let counts: OutcomeCounts = serde_json::from_str(counts)
            .map_err(|e| Error::Domain(format!("Invalid outcome table: {}", e)))?;
        let source = FixedSource::new(counts)?;
        let samples = source.samples();
        (samples, analyze_source(&source, samples, &settings, args.include_bits)?)
    } else {
        let name = args.source.unwrap_or(config.defaults.source.clone());
        let samples = args.samples.unwrap_or(config.defaults.samples);
        let seed = args.seed.or(config.seed());
        let source = get_source(&name, args.width, seed)?;
        (samples, analyze_source(source.as_ref(), samples, &settings, args.include_bits)?)
    };

    let report = ComparisonReport {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        samples,
        settings,
        sources: vec![report],
    };

    super::emit(&formatter.format_comparison(&report)?, args.output)
}
