//! Conversions between binary strings, decimal values and ranged integers
//!
//! Every function comes in a scalar form and an [`OutcomeCounts`] form. The
//! ranged mapping is
//!
//! ```text
//! mapped = round(min + d / (2^width - 1) * (max - min))
//! ```
//!
//! rounding half away from zero, so `d = 0` lands exactly on `min` and
//! `d = 2^width - 1` exactly on `max`. The arithmetic is done in `i128`, so
//! this holds for any `i64` bounds.

use crate::constants::width::MAX_BIT_WIDTH;
use crate::counts::{DecimalCounts, MappedCounts, OutcomeCounts};
use crate::error::{Error, Result};

/// Largest value representable in `width` bits
pub fn max_value(width: u32) -> Result<u64> {
    check_width(width)?;
    Ok((1u64 << width) - 1)
}

/// Zero-pad the binary representation of `value` to `width` characters
pub fn to_binary_string(value: u64, width: u32) -> Result<String> {
    let max = max_value(width)?;
    if value > max {
        return Err(Error::Domain(format!(
            "Value {} needs more than {} bits",
            value, width
        )));
    }
    Ok(format!("{:0width$b}", value, width = width as usize))
}

/// Left-pad every key of a table to `width`, preserving counts
pub fn counts_to_binary(counts: &OutcomeCounts, width: u32) -> Result<OutcomeCounts> {
    check_width(width)?;
    let mut padded = OutcomeCounts::new();
    for (symbol, count) in counts.iter() {
        padded.add(pad_symbol(symbol, width)?, count)?;
    }
    Ok(padded)
}

/// Interpret a binary string as an unsigned integer
pub fn to_decimal(symbol: &str, width: u32) -> Result<u64> {
    check_width(width)?;
    if symbol.is_empty() {
        return Err(Error::Domain("Empty binary string".to_string()));
    }
    if symbol.len() > width as usize {
        return Err(Error::Domain(format!(
            "Binary string '{}' is longer than {} bits",
            symbol, width
        )));
    }
    u64::from_str_radix(symbol, 2)
        .map_err(|_| Error::Domain(format!("'{}' is not a binary string", symbol)))
}

/// Interpret every key of a table as an unsigned integer
pub fn counts_to_decimal(counts: &OutcomeCounts, width: u32) -> Result<DecimalCounts> {
    let mut decimal = DecimalCounts::new();
    for (symbol, count) in counts.iter() {
        *decimal.entry(to_decimal(symbol, width)?).or_insert(0) += count;
    }
    Ok(decimal)
}

/// Linearly map `decimal` from `[0, 2^width - 1]` onto `[min, max]`
pub fn to_range(decimal: u64, width: u32, min: i64, max: i64) -> Result<i64> {
    let max_possible = max_value(width)?;
    if decimal > max_possible {
        return Err(Error::Domain(format!(
            "Decimal value {} exceeds {} for width {}",
            decimal, max_possible, width
        )));
    }
    // Exact in i128: |span| < 2^64 and decimal < 2^63
    let num = (max as i128 - min as i128) * decimal as i128;
    let den = max_possible as i128;
    let mut offset = num / den;
    if 2 * (num % den).abs() >= den {
        offset += num.signum();
    }
    i64::try_from(min as i128 + offset).map_err(|_| {
        Error::Domain(format!(
            "Mapped value for {} does not fit in [{}, {}]",
            decimal, min, max
        ))
    })
}

/// Map every key of a table onto `[min, max]`
///
/// Distinct keys that land on the same integer have their counts summed.
pub fn counts_to_range(
    counts: &OutcomeCounts,
    width: u32,
    min: i64,
    max: i64,
) -> Result<MappedCounts> {
    let mut mapped = MappedCounts::new();
    for (decimal, count) in counts_to_decimal(counts, width)? {
        *mapped.entry(to_range(decimal, width, min, max)?).or_insert(0) += count;
    }
    Ok(mapped)
}

/// Check that a mapped value lies in `[min, max]`
pub fn validate_range(value: i64, min: i64, max: i64) -> Result<()> {
    if value < min || value > max {
        return Err(Error::Range { value, min, max });
    }
    Ok(())
}

/// Check every key of a mapped table, reporting the first offender
pub fn validate_mapped(mapped: &MappedCounts, min: i64, max: i64) -> Result<()> {
    for value in mapped.keys() {
        validate_range(*value, min, max)?;
    }
    Ok(())
}

fn check_width(width: u32) -> Result<()> {
    if width == 0 {
        return Err(Error::Domain("Bit width must be at least 1".to_string()));
    }
    if width > MAX_BIT_WIDTH {
        return Err(Error::Domain(format!(
            "Bit width {} exceeds maximum of {}",
            width, MAX_BIT_WIDTH
        )));
    }
    Ok(())
}

fn pad_symbol(symbol: &str, width: u32) -> Result<String> {
    if symbol.len() > width as usize {
        return Err(Error::Domain(format!(
            "Symbol '{}' is longer than {} bits",
            symbol, width
        )));
    }
    Ok(format!("{:0>width$}", symbol, width = width as usize))
}
