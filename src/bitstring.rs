//! Bit sequences built from entropy source output
//!
//! A [`Bitstring`] remembers whether its order is the true draw order
//! ([`BitOrder::Temporal`]) or was rebuilt from an outcome table
//! ([`BitOrder::Aggregate`]). Rebuilding from counts cannot recover the
//! order of individual draws, so aggregate bitstrings are clustered
//! (`"0"*c0 + "1"*c1`) and any position-sensitive test on them measures that
//! clustering rather than the source.

use crate::counts::OutcomeCounts;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provenance of a bitstring's ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitOrder {
    /// Bits appear in the order they were drawn
    Temporal,
    /// Bits were concatenated from an outcome table; order is arbitrary
    Aggregate,
}

impl fmt::Display for BitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitOrder::Temporal => write!(f, "temporal"),
            BitOrder::Aggregate => write!(f, "aggregate"),
        }
    }
}

/// An ordered sequence of bits (each 0 or 1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitstring {
    bits: Vec<u8>,
    order: BitOrder,
}

impl Bitstring {
    /// Wrap bits drawn in true order
    ///
    /// Fails if any element is not 0 or 1.
    pub fn from_sequence(bits: Vec<u8>) -> Result<Self> {
        if let Some(pos) = bits.iter().position(|b| *b > 1) {
            return Err(Error::Domain(format!(
                "Bit at position {} has value {}, expected 0 or 1",
                pos, bits[pos]
            )));
        }
        Ok(Self {
            bits,
            order: BitOrder::Temporal,
        })
    }

    /// Rebuild a bitstring from an outcome table
    ///
    /// Each symbol is repeated `count` times, symbols in ascending order. For
    /// 1-bit symbols this is `"0"*count0 + "1"*count1`. The result is labeled
    /// [`BitOrder::Aggregate`].
    pub fn from_counts(counts: &OutcomeCounts) -> Result<Self> {
        let width = counts.fixed_width()?;
        let too_large = || {
            Error::Domain(format!(
                "{} samples of {} bits do not fit in memory",
                counts.total(),
                width
            ))
        };
        let len = usize::try_from(counts.total())
            .ok()
            .and_then(|total| total.checked_mul(width))
            .ok_or_else(too_large)?;
        let mut bits = Vec::new();
        bits.try_reserve_exact(len).map_err(|_| too_large())?;
        for (symbol, count) in counts.iter() {
            let symbol_bits: Vec<u8> = symbol.bytes().map(|b| b - b'0').collect();
            for _ in 0..count {
                bits.extend_from_slice(&symbol_bits);
            }
        }
        Ok(Self {
            bits,
            order: BitOrder::Aggregate,
        })
    }

    /// The bits, each 0 or 1
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn order(&self) -> BitOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of 1 bits
    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|b| **b == 1).count()
    }

    /// Number of 0 bits
    pub fn zeros(&self) -> usize {
        self.bits.len() - self.ones()
    }
}

impl FromStr for Bitstring {
    type Err = Error;

    /// Parse a string of '0'/'1' characters as a temporally ordered sequence
    fn from_str(s: &str) -> Result<Self> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(0),
                '1' => Ok(1),
                other => Err(Error::Domain(format!(
                    "Bitstring contains non-binary character '{}'",
                    other
                ))),
            })
            .collect::<Result<Vec<u8>>>()?;
        Ok(Self {
            bits,
            order: BitOrder::Temporal,
        })
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.bits {
            write!(f, "{}", b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_counts_clusters_symbols() {
        let counts = OutcomeCounts::from_pairs([("1", 3), ("0", 2)]).unwrap();
        let bits = Bitstring::from_counts(&counts).unwrap();

        assert_eq!(bits.to_string(), "00111");
        assert_eq!(bits.order(), BitOrder::Aggregate);
        assert_eq!(bits.ones(), 3);
        assert_eq!(bits.zeros(), 2);
    }

    #[test]
    fn test_from_counts_multi_bit_symbols() {
        let counts = OutcomeCounts::from_pairs([("10", 1), ("01", 2)]).unwrap();
        let bits = Bitstring::from_counts(&counts).unwrap();
        assert_eq!(bits.to_string(), "010110");
        assert_eq!(bits.len(), 6);
    }

    #[test]
    fn test_from_counts_rejects_mixed_width() {
        let counts = OutcomeCounts::from_pairs([("1", 1), ("01", 2)]).unwrap();
        assert!(Bitstring::from_counts(&counts).is_err());
    }

    #[test]
    fn test_from_counts_rejects_oversized_tables() {
        let counts = OutcomeCounts::from_pairs([("0101", u64::MAX)]).unwrap();
        assert!(matches!(Bitstring::from_counts(&counts), Err(Error::Domain(_))));
    }

    #[test]
    fn test_parse() {
        let bits: Bitstring = "0110".parse().unwrap();
        assert_eq!(bits.bits(), &[0, 1, 1, 0]);
        assert_eq!(bits.order(), BitOrder::Temporal);

        assert!("01x0".parse::<Bitstring>().is_err());
    }

    #[test]
    fn test_from_sequence_rejects_non_bits() {
        assert!(Bitstring::from_sequence(vec![0, 1, 2]).is_err());
        assert!(Bitstring::from_sequence(vec![]).unwrap().is_empty());
    }
}
