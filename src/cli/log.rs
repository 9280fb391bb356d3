//! Log command handler
//!
//! View the trial run log.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::runlog::RunLog;
use clap::{Args, Subcommand};

/// Log command arguments
#[derive(Args)]
pub struct LogArgs {
    #[command(subcommand)]
    pub command: Option<LogCommand>,
}

/// Log subcommands
#[derive(Subcommand)]
pub enum LogCommand {
    /// List logged runs
    List,
    /// Print every trial of one run as JSON lines
    Show {
        /// Run ID (as printed in the uniformity report)
        run_id: String,
    },
    /// Show the run log path
    Path,
}

/// Run the log command
pub fn run(args: LogArgs) -> Result<()> {
    let config = Config::load()?;
    let path = config.log_path()?;

    match args.command.unwrap_or(LogCommand::List) {
        LogCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
        LogCommand::List => list_runs(&RunLog::load_from(path)?),
        LogCommand::Show { run_id } => show_run(&RunLog::load_from(path)?, &run_id),
    }
}

fn list_runs(log: &RunLog) -> Result<()> {
    if log.is_empty() {
        println!("No logged runs.");
        return Ok(());
    }

    println!("Logged runs ({} trials total):\n", log.len());
    for run_id in log.runs() {
        let records = log.run(run_id);
        let first = records[0];
        println!(
            "  {} - {} | {} trials x {} shots | {}",
            run_id,
            first.source,
            records.len(),
            first.counts.total(),
            first.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

fn show_run(log: &RunLog, run_id: &str) -> Result<()> {
    let records = log.run(run_id);
    if records.is_empty() {
        return Err(Error::Config(format!("No logged run with id {}", run_id)));
    }
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}
