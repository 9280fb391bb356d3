//! Outcome frequency tables
//!
//! An [`OutcomeCounts`] maps fixed-width binary symbol strings (e.g. `"0"`,
//! `"1011"`) to how many times each was observed. It is what every entropy
//! source returns and what the mapper and aggregator consume.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decimal value -> count
pub type DecimalCounts = BTreeMap<u64, u64>;

/// Mapped (ranged) value -> count
pub type MappedCounts = BTreeMap<i64, u64>;

/// Frequency table of binary symbol strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u64>", into = "BTreeMap<String, u64>")]
pub struct OutcomeCounts {
    counts: BTreeMap<String, u64>,
}

impl OutcomeCounts {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an existing map, validating every key
    ///
    /// Fails if the counts sum past `u64::MAX`.
    pub fn from_map(map: BTreeMap<String, u64>) -> Result<Self> {
        let mut total = 0u64;
        for (key, count) in &map {
            check_symbol(key)?;
            total = checked_total(total, *count)?;
        }
        Ok(Self { counts: map })
    }

    /// Build a table from `(symbol, count)` pairs, summing repeated symbols
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut counts = Self::new();
        for (symbol, count) in pairs {
            counts.add(symbol, count)?;
        }
        Ok(counts)
    }

    /// Add `count` occurrences of `symbol`
    pub fn add(&mut self, symbol: impl Into<String>, count: u64) -> Result<()> {
        let symbol = symbol.into();
        check_symbol(&symbol)?;
        checked_total(self.total(), count)?;
        *self.counts.entry(symbol).or_insert(0) += count;
        Ok(())
    }

    /// Count for a symbol (0 if never observed)
    pub fn get(&self, symbol: &str) -> u64 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Iterate over `(symbol, count)` in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all counts (the number of samples drawn)
    ///
    /// Construction keeps this sum within `u64`.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Length of the longest key, or 0 for an empty table
    pub fn width(&self) -> usize {
        self.counts.keys().map(String::len).max().unwrap_or(0)
    }

    /// The common key length; fails if keys have mixed lengths
    pub fn fixed_width(&self) -> Result<usize> {
        let width = self.width();
        if let Some(key) = self.counts.keys().find(|k| k.len() != width) {
            return Err(Error::Domain(format!(
                "Symbol '{}' has width {}, expected {}",
                key,
                key.len(),
                width
            )));
        }
        Ok(width)
    }

    /// Merge another table into this one by summing counts
    pub fn merge(&mut self, other: &OutcomeCounts) -> Result<()> {
        checked_total(self.total(), other.total())?;
        for (symbol, count) in &other.counts {
            *self.counts.entry(symbol.clone()).or_insert(0) += count;
        }
        Ok(())
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }
}

impl TryFrom<BTreeMap<String, u64>> for OutcomeCounts {
    type Error = Error;

    fn try_from(map: BTreeMap<String, u64>) -> Result<Self> {
        Self::from_map(map)
    }
}

impl From<OutcomeCounts> for BTreeMap<String, u64> {
    fn from(counts: OutcomeCounts) -> Self {
        counts.counts
    }
}

fn checked_total(total: u64, count: u64) -> Result<u64> {
    total
        .checked_add(count)
        .ok_or_else(|| Error::Domain("Outcome counts overflow a 64-bit total".to_string()))
}

/// A symbol must be a non-empty string over {'0', '1'}
fn check_symbol(symbol: &str) -> Result<()> {
    if symbol.is_empty() {
        return Err(Error::Domain("Empty outcome symbol".to_string()));
    }
    if let Some(c) = symbol.chars().find(|c| *c != '0' && *c != '1') {
        return Err(Error::Domain(format!(
            "Outcome symbol '{}' contains non-binary character '{}'",
            symbol, c
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sums_duplicates() {
        let counts = OutcomeCounts::from_pairs([("0", 3), ("1", 2), ("0", 4)]).unwrap();
        assert_eq!(counts.get("0"), 7);
        assert_eq!(counts.get("1"), 2);
        assert_eq!(counts.total(), 9);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_rejects_non_binary_symbol() {
        assert!(OutcomeCounts::from_pairs([("012", 1)]).is_err());
        assert!(OutcomeCounts::from_pairs([("", 1)]).is_err());
    }

    #[test]
    fn test_fixed_width() {
        let counts = OutcomeCounts::from_pairs([("0010", 3), ("0011", 5)]).unwrap();
        assert_eq!(counts.fixed_width().unwrap(), 4);

        let mixed = OutcomeCounts::from_pairs([("10", 3), ("011", 5)]).unwrap();
        assert_eq!(mixed.width(), 3);
        assert!(mixed.fixed_width().is_err());
    }

    #[test]
    fn test_merge() {
        let mut a = OutcomeCounts::from_pairs([("0", 10), ("1", 5)]).unwrap();
        let b = OutcomeCounts::from_pairs([("1", 5), ("0", 1)]).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.get("0"), 11);
        assert_eq!(a.get("1"), 10);
    }

    #[test]
    fn test_total_overflow_is_rejected() {
        assert!(matches!(
            OutcomeCounts::from_pairs([("0", u64::MAX), ("1", 1)]),
            Err(Error::Domain(_))
        ));

        let bad: std::result::Result<OutcomeCounts, _> =
            serde_json::from_str(r#"{"0":18446744073709551615,"1":1}"#);
        assert!(bad.is_err());

        let mut full = OutcomeCounts::from_pairs([("0", u64::MAX)]).unwrap();
        assert_eq!(full.total(), u64::MAX);
        let one = OutcomeCounts::from_pairs([("1", 1)]).unwrap();
        assert!(full.merge(&one).is_err());
        assert_eq!(full.total(), u64::MAX);
    }

    #[test]
    fn test_json_shape() {
        let counts = OutcomeCounts::from_pairs([("0", 512), ("1", 512)]).unwrap();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"0":512,"1":512}"#);

        let parsed: OutcomeCounts = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, counts);

        let bad: std::result::Result<OutcomeCounts, _> = serde_json::from_str(r#"{"2":1}"#);
        assert!(bad.is_err());
    }
}
