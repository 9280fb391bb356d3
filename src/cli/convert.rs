//! Convert command handler
//!
//! Maps bitstrings (or a JSON outcome table) to decimal values and onto an
//! integer range.

use crate::config::Config;
use crate::counts::OutcomeCounts;
use crate::error::{Error, Result};
use crate::mapper::{counts_to_range, to_decimal, to_range, validate_mapped, validate_range};
use clap::Args;
use serde_json::json;

/// Convert command arguments
#[derive(Args)]
pub struct ConvertArgs {
    /// Bitstring to convert (e.g., "0111")
    #[arg(required_unless_present = "counts", conflicts_with = "counts")]
    pub bits: Option<String>,

    /// JSON outcome table (e.g., '{"0000": 10, "1111": 5}')
    #[arg(long, short = 'c')]
    pub counts: Option<String>,

    /// Bit width of each symbol
    #[arg(long, short = 'w')]
    pub width: Option<u32>,

    /// Lower bound of the target range
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<i64>,

    /// Upper bound of the target range
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<i64>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the convert command
pub fn run(args: ConvertArgs) -> Result<()> {
    let config = Config::load()?;
    let width = args.width.unwrap_or(config.mapping.bit_width);
    let min = args.min.unwrap_or(config.mapping.min);
    let max = args.max.unwrap_or(config.mapping.max);

    if let Some(counts) = &args.counts {
        let counts: OutcomeCounts = serde_json::from_str(counts)
            .map_err(|e| Error::Domain(format!("Invalid outcome table: {}", e)))?;
        return convert_counts(&counts, width, min, max, args.json);
    }

    let bits = args.bits.unwrap_or_default();
    let decimal = to_decimal(&bits, width)?;
    let mapped = to_range(decimal, width, min, max)?;
    validate_range(mapped, min, max)?;

    if args.json {
        let output = json!({
            "bits": bits,
            "width": width,
            "decimal": decimal,
            "min": min,
            "max": max,
            "mapped": mapped,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} -> {} -> {} in [{}, {}]", bits, decimal, mapped, min, max);
    }
    Ok(())
}

fn convert_counts(
    counts: &OutcomeCounts,
    width: u32,
    min: i64,
    max: i64,
    as_json: bool,
) -> Result<()> {
    let mapped = counts_to_range(counts, width, min, max)?;
    validate_mapped(&mapped, min, max)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&mapped)?);
        return Ok(());
    }

    println!("Mapped counts ({}-bit onto [{}, {}]):", width, min, max);
    for (value, count) in &mapped {
        println!("  {:>6}: {}", value, count);
    }
    println!("Total: {}", counts.total());
    Ok(())
}
