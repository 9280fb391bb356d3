//! Fixed (replay) source
//!
//! Replays a recorded outcome table, e.g. a trial loaded from the run log or
//! counts pasted on the command line, so it can be tested the same way as a
//! live source.

use crate::counts::OutcomeCounts;
use crate::error::{Error, Result};
use crate::source::EntropySource;

/// Source that always returns the same outcome table
#[derive(Debug, Clone)]
pub struct FixedSource {
    counts: OutcomeCounts,
    width: u32,
}

impl FixedSource {
    /// Create a replay source; the table must be non-empty with a single key width
    pub fn new(counts: OutcomeCounts) -> Result<Self> {
        if counts.is_empty() {
            return Err(Error::Domain("Cannot replay an empty outcome table".to_string()));
        }
        let width = counts.fixed_width()? as u32;
        Ok(Self { counts, width })
    }

    /// Number of samples in the recorded table
    pub fn samples(&self) -> usize {
        self.counts.total() as usize
    }
}

impl EntropySource for FixedSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn description(&self) -> &'static str {
        "Replays a recorded outcome table"
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn draw(&self, sample_count: usize) -> Result<OutcomeCounts> {
        if sample_count != self.samples() {
            return Err(Error::Domain(format!(
                "Recorded table holds {} samples, {} requested",
                self.samples(),
                sample_count
            )));
        }
        Ok(self.counts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstring::BitOrder;

    #[test]
    fn test_replay() {
        let counts = OutcomeCounts::from_pairs([("0", 512), ("1", 512)]).unwrap();
        let source = FixedSource::new(counts.clone()).unwrap();

        assert_eq!(source.width(), 1);
        assert_eq!(source.samples(), 1024);
        assert_eq!(source.draw(1024).unwrap(), counts);
        assert!(source.draw(1000).is_err());

        let bits = source.draw_bitstring(1024).unwrap();
        assert_eq!(bits.order(), BitOrder::Aggregate);
        assert_eq!(bits.ones(), 512);
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(FixedSource::new(OutcomeCounts::new()).is_err());
        let mixed = OutcomeCounts::from_pairs([("0", 1), ("11", 1)]).unwrap();
        assert!(FixedSource::new(mixed).is_err());
    }
}
