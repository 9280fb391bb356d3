//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod compare;
pub mod config;
pub mod convert;
pub mod log;
pub mod sources;
pub mod test;
pub mod uniformity;

use crate::error::{Error, Result};
use crate::format::{get_formatter, ReportFormatter};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Randomness auditor for simulated-quantum and pseudorandom bit sources
#[derive(Parser)]
#[command(name = "q-audit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert bitstrings to decimal and mapped range values
    Convert(convert::ConvertArgs),

    /// Run the randomness tests on one source or input
    Test(test::TestArgs),

    /// Compare the statistical properties of several sources
    Compare(compare::CompareArgs),

    /// Check the mapped distribution over repeated trials
    Uniformity(uniformity::UniformityArgs),

    /// List available sources and output formats
    Sources(sources::SourcesArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// View the trial run log
    Log(log::LogArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert(args) => convert::run(args),
        Commands::Test(args) => test::run(args),
        Commands::Compare(args) => compare::run(args),
        Commands::Uniformity(args) => uniformity::run(args).await,
        Commands::Sources(args) => sources::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Log(args) => log::run(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Look up a formatter, failing on unknown names
fn formatter(name: &str) -> Result<Box<dyn ReportFormatter>> {
    get_formatter(name).ok_or_else(|| Error::Config(format!("Unknown format: {}", name)))
}

/// Print output, or write it to `path` when given
fn emit(output: &str, path: Option<String>) -> Result<()> {
    if let Some(path) = path {
        std::fs::write(&path, output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }
    Ok(())
}
