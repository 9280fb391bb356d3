//! Uniformity command handler
//!
//! Runs repeated trials on a source, maps every outcome onto the target
//! range and compares the aggregate against the expected distribution.
//! Fails with a tolerance error when any mapped value is off by more than
//! the configured relative error.

use crate::aggregate::{evaluate_uniformity, run_trials, ExpectedCache};
use crate::config::Config;
use crate::error::Result;
use crate::runlog::RunLog;
use crate::source::{get_source, EntropySource};
use clap::Args;
use std::sync::Arc;
use tracing::info;

/// Uniformity command arguments
#[derive(Args)]
pub struct UniformityArgs {
    /// Entropy source to draw from
    #[arg(long, short = 's', conflicts_with = "replay")]
    pub source: Option<String>,

    /// Re-evaluate a logged run instead of drawing new trials
    #[arg(long)]
    pub replay: Option<String>,

    /// Bit width of each symbol
    #[arg(long, short = 'w')]
    pub width: Option<u32>,

    /// Lower bound of the target range
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<i64>,

    /// Upper bound of the target range
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<i64>,

    /// Number of independent trials
    #[arg(long, short = 't')]
    pub trials: Option<usize>,

    /// Shots per trial
    #[arg(long)]
    pub shots: Option<usize>,

    /// Maximum relative error per mapped value
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Trials run at once
    #[arg(long)]
    pub workers: Option<usize>,

    /// Seed for reproducible draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append trial outcomes to the run log
    #[arg(long, conflicts_with = "no_log")]
    pub log: bool,

    /// Don't append to the run log even if enabled in config
    #[arg(long)]
    pub no_log: bool,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

/// Run the uniformity command
pub async fn run(args: UniformityArgs) -> Result<()> {
    let config = Config::load()?;
    let format = args.format.clone().unwrap_or(config.defaults.format.clone());
    let formatter = super::formatter(&format)?;

    let mut settings = config.uniformity_settings();
    settings.bit_width = args.width.unwrap_or(settings.bit_width);
    settings.min = args.min.unwrap_or(settings.min);
    settings.max = args.max.unwrap_or(settings.max);
    settings.trials = args.trials.unwrap_or(settings.trials);
    settings.shots = args.shots.unwrap_or(settings.shots);
    settings.tolerance = args.tolerance.unwrap_or(settings.tolerance);
    settings.workers = args.workers.unwrap_or(settings.workers);

    let cache = ExpectedCache::new();
    // Reject bad mapping parameters before drawing anything
    cache.get(settings.bit_width, settings.min, settings.max)?;

    let report = if let Some(run_id) = &args.replay {
        let log = RunLog::load_from(config.log_path()?)?;
        let outcomes = log.outcomes(run_id)?;
        let source = log.run(run_id)[0].source.clone();
        settings.trials = outcomes.len();
        settings.shots = outcomes[0].counts.total() as usize;
        info!(run_id, trials = outcomes.len(), "replaying logged run");
        evaluate_uniformity(&source, &outcomes, &settings, &cache)?
    } else {
        let name = args.source.clone().unwrap_or(config.defaults.source.clone());
        let seed = args.seed.or(config.seed());
        let source: Arc<dyn EntropySource> =
            Arc::from(get_source(&name, settings.bit_width, seed)?);

        let outcomes = run_trials(
            Arc::clone(&source),
            settings.trials,
            settings.shots,
            settings.workers,
        )
        .await?;
        let report = evaluate_uniformity(source.name(), &outcomes, &settings, &cache)?;

        if (config.log.enabled || args.log) && !args.no_log {
            let mut log = RunLog::load_from(config.log_path()?)?;
            log.append_run(&report.id, source.name(), &outcomes)?;
            eprintln!("Logged {} trials to {}", outcomes.len(), log.path().display());
        }
        report
    };

    super::emit(&formatter.format_uniformity(&report)?, args.output.clone())?;

    report.ensure_passed()
}
