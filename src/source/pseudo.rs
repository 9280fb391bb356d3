//! Pseudo-random source (classical baseline)
//!
//! Uses the `rand` crate's thread-local RNG, or a seeded `StdRng` for
//! reproducible runs. Unlike the simulated superposition source, these know
//! the order of their draws and return temporally ordered bitstrings.

use crate::bitstring::Bitstring;
use crate::counts::OutcomeCounts;
use crate::error::{Error, Result};
use crate::source::{symbols_to_bits, tally_symbols, EntropySource};
use rand::Rng;
use std::sync::Mutex;
use tracing::debug;

/// Pseudo-random source backed by the thread-local RNG
pub struct PseudoSource {
    width: u32,
}

impl PseudoSource {
    /// Create a new pseudo-random source producing `width`-bit symbols
    pub fn new(width: u32) -> Self {
        Self { width }
    }
}

impl Default for PseudoSource {
    fn default() -> Self {
        Self::new(1)
    }
}

impl EntropySource for PseudoSource {
    fn name(&self) -> &'static str {
        "pseudo"
    }

    fn description(&self) -> &'static str {
        "Pseudo-random number generator (classical baseline)"
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn draw(&self, sample_count: usize) -> Result<OutcomeCounts> {
        let symbols = random_symbols(&mut rand::thread_rng(), sample_count, self.width)?;
        debug!(source = self.name(), sample_count, "drew pseudo-random symbols");
        tally_symbols(&symbols, self.width)
    }

    fn draw_bitstring(&self, sample_count: usize) -> Result<Bitstring> {
        let symbols = random_symbols(&mut rand::thread_rng(), sample_count, self.width)?;
        Bitstring::from_sequence(symbols_to_bits(&symbols, self.width))
    }
}

/// Seeded pseudo-random source for deterministic testing
pub struct SeededPseudoSource {
    width: u32,
    rng: Mutex<rand::rngs::StdRng>,
}

impl SeededPseudoSource {
    /// Create a new seeded pseudo-random source
    ///
    /// Using the same seed will produce the same sequence of draws.
    pub fn new(width: u32, seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            width,
            rng: Mutex::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }

    fn symbols(&self, sample_count: usize) -> Result<Vec<u64>> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| Error::Source("Seeded RNG lock poisoned".to_string()))?;
        random_symbols(&mut *rng, sample_count, self.width)
    }
}

impl EntropySource for SeededPseudoSource {
    fn name(&self) -> &'static str {
        "pseudo-seeded"
    }

    fn description(&self) -> &'static str {
        "Seeded pseudo-random number generator (for reproducible testing)"
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn draw(&self, sample_count: usize) -> Result<OutcomeCounts> {
        let symbols = self.symbols(sample_count)?;
        debug!(source = self.name(), sample_count, "drew pseudo-random symbols");
        tally_symbols(&symbols, self.width)
    }

    fn draw_bitstring(&self, sample_count: usize) -> Result<Bitstring> {
        let symbols = self.symbols(sample_count)?;
        Bitstring::from_sequence(symbols_to_bits(&symbols, self.width))
    }
}

fn random_symbols<R: Rng>(rng: &mut R, n: usize, width: u32) -> Result<Vec<u64>> {
    let max = crate::mapper::max_value(width)?;
    Ok((0..n).map(|_| rng.gen_range(0..=max)).collect())
}
