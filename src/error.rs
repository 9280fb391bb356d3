//! Error types for q-audit

use thiserror::Error;

/// Main error type for q-audit operations
#[derive(Error, Debug)]
pub enum Error {
    /// Structurally invalid input: empty bitstring, zero bit width,
    /// window longer than the sequence, malformed symbol strings
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Mapped value {value} out of range [{min}, {max}]")]
    Range { value: i64, min: i64, max: i64 },

    #[error(
        "Relative error for mapped value {value} too high: observed {observed:.3}, \
         expected {expected:.3}, relative error {relative_error:.2} > tolerance {tolerance:.2}"
    )]
    ToleranceExceeded {
        value: i64,
        observed: f64,
        expected: f64,
        relative_error: f64,
        tolerance: f64,
    },

    #[error("Entropy source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for q-audit operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_names_value() {
        let err = Error::Range {
            value: 25,
            min: 10,
            max: 20,
        };
        assert_eq!(err.to_string(), "Mapped value 25 out of range [10, 20]");
    }

    #[test]
    fn test_tolerance_error_names_key() {
        let err = Error::ToleranceExceeded {
            value: 13,
            observed: 0.01,
            expected: 0.0625,
            relative_error: 0.84,
            tolerance: 0.4,
        };
        let msg = err.to_string();
        assert!(msg.contains("mapped value 13"));
        assert!(msg.contains("0.84"));
    }
}
