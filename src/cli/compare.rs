//! Compare command handler
//!
//! Draws the same number of symbols from each source and reports their
//! statistical properties side by side.

use crate::comparison::compare_sources;
use crate::config::Config;
use crate::error::Result;
use crate::source::{get_source, EntropySource};
use clap::Args;

/// Compare command arguments
#[derive(Args)]
pub struct CompareArgs {
    /// Sources to compare
    #[arg(long, short = 's', value_delimiter = ',', default_values = ["superposition", "pseudo"])]
    pub sources: Vec<String>,

    /// Number of symbols to draw from each source
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Bit width of each drawn symbol
    #[arg(long, short = 'w', default_value = "1")]
    pub width: u32,

    /// Seed for reproducible draws (shared by all sources)
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

/// Run the compare command
pub fn run(args: CompareArgs) -> Result<()> {
    let config = Config::load()?;
    let samples = args.samples.unwrap_or(config.defaults.samples);
    let seed = args.seed.or(config.seed());
    let format = args.format.unwrap_or(config.defaults.format.clone());
    let formatter = super::formatter(&format)?;

    let sources = args
        .sources
        .iter()
        .map(|name| get_source(name, args.width, seed))
        .collect::<Result<Vec<_>>>()?;
    let borrowed: Vec<&dyn EntropySource> = sources.iter().map(|s| s.as_ref()).collect();

    let report = compare_sources(&borrowed, samples, &config.test_settings(), args.include_bits)?;

    super::emit(&formatter.format_comparison(&report)?, args.output)
}
