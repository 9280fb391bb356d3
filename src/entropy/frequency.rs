//! Frequency (monobit) test
//!
//! With `s = ones - zeros` over `n` bits, `s_obs = |s| / sqrt(n)` and the
//! p-value is `erfc(s_obs / sqrt(2))`. Only the 0/1 ratio matters; bit
//! order is ignored, so aggregate and temporal bitstrings score the same.

use crate::bitstring::Bitstring;
use crate::entropy::TestResult;
use crate::error::{Error, Result};
use statrs::function::erf::erfc;

/// Monobit p-value (closer to 1.0 means better balanced)
pub fn monobit_p_value(bits: &Bitstring) -> Result<f64> {
    Ok(erfc(s_obs(bits)? / std::f64::consts::SQRT_2))
}

/// Monobit test, flagging the sequence when the p-value is below `significance`
pub fn frequency_test(bits: &Bitstring, significance: f64) -> Result<TestResult> {
    let statistic = s_obs(bits)?;
    let p_value = erfc(statistic / std::f64::consts::SQRT_2);
    Ok(TestResult::new(statistic, None, p_value, significance))
}

fn s_obs(bits: &Bitstring) -> Result<f64> {
    let n = bits.len();
    if n == 0 {
        return Err(Error::Domain("The input bitstring is empty".to_string()));
    }
    let s = bits.ones() as i64 - bits.zeros() as i64;
    Ok((s.abs() as f64) / (n as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::OutcomeCounts;
    use crate::source::pseudo::SeededPseudoSource;
    use crate::source::EntropySource;
    use approx::assert_relative_eq;

    #[test]
    fn test_balanced_is_one() {
        let bits: Bitstring = "01".repeat(512).parse().unwrap();
        let result = frequency_test(&bits, 0.01).unwrap();

        assert_relative_eq!(result.statistic, 0.0);
        assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-12);
        assert!(!result.non_random);
        assert_eq!(result.degrees_of_freedom, None);
    }

    #[test]
    fn test_all_zeros_fails() {
        let bits: Bitstring = "0000".repeat(256).parse().unwrap();
        let p = monobit_p_value(&bits).unwrap();
        assert!(p < 1e-10, "All zeros should fail monobit test, got {}", p);

        let bits: Bitstring = "1".repeat(1000).parse().unwrap();
        let result = frequency_test(&bits, 0.01).unwrap();
        assert!(result.non_random);
    }

    #[test]
    fn test_known_value() {
        // NIST SP 800-22 2.1.8 example: "1011010101", s_obs = 0.632456
        let bits: Bitstring = "1011010101".parse().unwrap();
        let result = frequency_test(&bits, 0.01).unwrap();
        assert_relative_eq!(result.statistic, 0.632456, epsilon = 1e-6);
        assert_relative_eq!(result.p_value, 0.527089, epsilon = 1e-6);
    }

    #[test]
    fn test_order_independent() {
        let counts = OutcomeCounts::from_pairs([("0", 300), ("1", 340)]).unwrap();
        let aggregate = Bitstring::from_counts(&counts).unwrap();
        let interleaved: Bitstring = ("01".repeat(300) + &"1".repeat(40)).parse().unwrap();

        assert_relative_eq!(
            monobit_p_value(&aggregate).unwrap(),
            monobit_p_value(&interleaved).unwrap()
        );
    }

    #[test]
    fn test_good_data() {
        let source = SeededPseudoSource::new(1, 42);
        let bits = source.draw_bitstring(10_000).unwrap();
        let p = monobit_p_value(&bits).unwrap();
        assert!(p > 0.001, "Good random data should pass monobit test, got {}", p);
    }

    #[test]
    fn test_empty_is_domain_error() {
        let bits: Bitstring = "".parse().unwrap();
        assert!(matches!(frequency_test(&bits, 0.01), Err(Error::Domain(_))));
    }
}
