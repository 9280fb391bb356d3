//! Sources command handler
//!
//! Lists the available entropy sources and output formats.

use crate::error::Result;
use crate::format::available_formats;
use crate::source::available_sources;
use clap::Args;

/// Sources command arguments
#[derive(Args)]
pub struct SourcesArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the sources command
pub fn run(args: SourcesArgs) -> Result<()> {
    let sources = available_sources();
    let formats = available_formats();

    if args.json {
        let output = serde_json::json!({
            "sources": sources,
            "formats": formats,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Available sources:");
    for source in &sources {
        println!("  {:14} - {}", source.name, source.description);
    }
    println!();
    println!("Available output formats:");
    for format in &formats {
        println!("  {:14} - {}", format.name, format.description);
    }
    Ok(())
}
