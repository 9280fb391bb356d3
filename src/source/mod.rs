//! Entropy sources
//!
//! This module defines the `EntropySource` trait and the sources that
//! implement it. Every source answers `draw(n)` with an outcome table whose
//! counts sum to exactly `n`, so the comparison reports can treat a
//! simulated-quantum source and a pseudorandom one interchangeably.
//!
//! ## Flex Point
//! Adding a new source requires:
//! 1. Create `src/source/{name}.rs` implementing `EntropySource`
//! 2. Add `pub mod {name};` below
//! 3. Register it in `get_source` and `available_sources`

pub mod fixed;
pub mod pseudo;
pub mod superposition;

use crate::bitstring::Bitstring;
use crate::counts::OutcomeCounts;
use crate::error::{Error, Result};
use crate::mapper::to_binary_string;
use serde::{Deserialize, Serialize};

/// A source of fixed-width random symbols
///
/// Implementations must be thread-safe (Send + Sync) so trials can run on
/// worker threads.
pub trait EntropySource: Send + Sync {
    /// Returns the source name (e.g., "superposition", "pseudo")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of this source
    fn description(&self) -> &'static str;

    /// Width in bits of each drawn symbol
    fn width(&self) -> u32;

    /// Draw `sample_count` symbols and return how often each occurred
    fn draw(&self, sample_count: usize) -> Result<OutcomeCounts>;

    /// Draw `sample_count` symbols as a flat bit sequence
    ///
    /// Default implementation rebuilds the sequence from `draw`, which loses
    /// draw order; the result is labeled as aggregate. Sources that can
    /// report the real order override this.
    fn draw_bitstring(&self, sample_count: usize) -> Result<Bitstring> {
        let counts = self.draw(sample_count)?;
        Bitstring::from_counts(&counts)
    }
}

/// Information about a source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Source name (used in config/CLI)
    pub name: String,
    /// Human-readable description
    pub description: String,
}

/// Build a source by name
///
/// `seed` makes the source reproducible. Unknown names are an error.
pub fn get_source(name: &str, width: u32, seed: Option<u64>) -> Result<Box<dyn EntropySource>> {
    match name {
        "superposition" | "quantum" => {
            let source = superposition::SuperpositionSource::uniform(width)?;
            Ok(Box::new(match seed {
                Some(seed) => source.with_seed(seed),
                None => source,
            }))
        }
        "pseudo" | "classical" => match seed {
            Some(seed) => Ok(Box::new(pseudo::SeededPseudoSource::new(width, seed))),
            None => Ok(Box::new(pseudo::PseudoSource::new(width))),
        },
        _ => Err(Error::Config(format!("Unknown entropy source: {}", name))),
    }
}

/// List all available sources with their info
pub fn available_sources() -> Vec<SourceInfo> {
    vec![
        SourceInfo {
            name: "superposition".to_string(),
            description: "Simulated qubits in equal superposition (Hadamard), measured by the Born rule"
                .to_string(),
        },
        SourceInfo {
            name: "pseudo".to_string(),
            description: "Pseudo-random number generator (classical baseline)".to_string(),
        },
    ]
}

/// Tally symbol values into an outcome table of `width`-bit keys
pub(crate) fn tally_symbols(symbols: &[u64], width: u32) -> Result<OutcomeCounts> {
    let mut tally = std::collections::BTreeMap::<u64, u64>::new();
    for &symbol in symbols {
        *tally.entry(symbol).or_insert(0) += 1;
    }

    let mut counts = OutcomeCounts::new();
    for (symbol, count) in tally {
        counts.add(to_binary_string(symbol, width)?, count)?;
    }
    Ok(counts)
}

/// Flatten symbol values into bits, most significant bit first
pub(crate) fn symbols_to_bits(symbols: &[u64], width: u32) -> Vec<u8> {
    let mut bits = Vec::with_capacity(symbols.len() * width as usize);
    for &symbol in symbols {
        for shift in (0..width).rev() {
            bits.push(((symbol >> shift) & 1) as u8);
        }
    }
    bits
}
