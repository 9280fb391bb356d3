//! Simulated superposition source
//!
//! Models a register of independently prepared qubits that is measured once
//! per shot. Each qubit is prepared in |0>, |1> (X gate) or the equal
//! superposition H|0>, and measurement samples it by the Born rule.
//!
//! Like a circuit simulator, the source only reports outcome counts, so the
//! order of individual shots is not available.
//!
//! Outcome keys are little-endian in qubit index: qubit 0 is the rightmost
//! character.

use crate::constants::width::MAX_BIT_WIDTH;
use crate::counts::OutcomeCounts;
use crate::error::{Error, Result};
use crate::source::{tally_symbols, EntropySource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::debug;

/// How a single qubit is prepared before measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preparation {
    /// |0>
    Zero,
    /// X|0> = |1>
    One,
    /// H|0> = (|0> + |1>) / sqrt(2)
    Hadamard,
}

impl Preparation {
    /// Probability of measuring 1 (|amplitude of |1>|^2)
    pub fn probability_one(&self) -> f64 {
        match self {
            Preparation::Zero => 0.0,
            Preparation::One => 1.0,
            Preparation::Hadamard => 0.5,
        }
    }
}

/// A measured register of prepared qubits
pub struct SuperpositionSource {
    qubits: Vec<Preparation>,
    rng: Mutex<StdRng>,
}

impl SuperpositionSource {
    /// Create a source from per-qubit preparations (qubit 0 first)
    pub fn new(qubits: Vec<Preparation>) -> Result<Self> {
        check_register_size(qubits.len())?;
        Ok(Self {
            qubits,
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// `width` qubits, each with a Hadamard gate applied
    pub fn uniform(width: u32) -> Result<Self> {
        let width = usize::try_from(width).unwrap_or(usize::MAX);
        check_register_size(width)?;
        Self::new(vec![Preparation::Hadamard; width])
    }

    /// Basis-state register from a string such as "101"
    ///
    /// Character `i` prepares qubit `i`: '1' applies an X gate, '0' leaves it
    /// in |0>. Every shot then measures the same outcome.
    pub fn from_initial_state(state: &str) -> Result<Self> {
        let qubits = state
            .chars()
            .map(|c| match c {
                '0' => Ok(Preparation::Zero),
                '1' => Ok(Preparation::One),
                other => Err(Error::Domain(format!(
                    "Initial state contains non-binary character '{}'",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(qubits)
    }

    /// Replace the entropy-seeded RNG with a deterministic one
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            qubits: self.qubits,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Per-qubit preparations, qubit 0 first
    pub fn preparations(&self) -> &[Preparation] {
        &self.qubits
    }

    fn measure<R: Rng>(&self, rng: &mut R) -> u64 {
        self.qubits
            .iter()
            .enumerate()
            .fold(0u64, |value, (i, prep)| {
                if rng.gen_bool(prep.probability_one()) {
                    value | (1 << i)
                } else {
                    value
                }
            })
    }
}

fn check_register_size(qubits: usize) -> Result<()> {
    if qubits == 0 {
        return Err(Error::Domain("Register needs at least one qubit".to_string()));
    }
    if qubits > MAX_BIT_WIDTH as usize {
        return Err(Error::Domain(format!(
            "Register of {} qubits exceeds maximum of {}",
            qubits, MAX_BIT_WIDTH
        )));
    }
    Ok(())
}

impl EntropySource for SuperpositionSource {
    fn name(&self) -> &'static str {
        "superposition"
    }

    fn description(&self) -> &'static str {
        "Simulated qubits in equal superposition (Hadamard), measured by the Born rule"
    }

    fn width(&self) -> u32 {
        self.qubits.len() as u32
    }

    fn draw(&self, sample_count: usize) -> Result<OutcomeCounts> {
        let shots = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| Error::Source("Simulator RNG lock poisoned".to_string()))?;
            (0..sample_count)
                .map(|_| self.measure(&mut *rng))
                .collect::<Vec<u64>>()
        };
        debug!(
            source = self.name(),
            qubits = self.qubits.len(),
            shots = sample_count,
            "measured register"
        );
        tally_symbols(&shots, self.width())
    }
}
