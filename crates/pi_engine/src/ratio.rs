//! Exact rational arithmetic for the π estimate.
//!
//! Totals reach 10^12 and beyond while the deltas tracked between successive
//! estimates are tiny, so every quantity reported by the engine is kept as a
//! [`BigRational`] and only turned into decimal text at the very end.

use std::time::Duration;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;

/// Fractional digits used for π and Δπ in progress reports.
pub const REPORT_DIGITS: usize = 30;

/// Nanoseconds in one millisecond; iterations per nanosecond times this is
/// thousands of iterations per second.
const NANOS_PER_MILLI: u64 = 1_000_000;

/// Returns the exact estimate `4 * inside / total`.
///
/// A `total` of zero is treated as one, so the estimate before any samples
/// have been collected is `0` rather than a division fault.
///
/// # Examples
///
/// ```rust
/// use num_rational::BigRational;
/// use pi_engine::ratio::pi_ratio;
///
/// let pi = pi_ratio(3, 8);
/// assert_eq!(pi, BigRational::new(3.into(), 2.into()));
/// ```
pub fn pi_ratio(inside: u64, total: u64) -> BigRational {
    let total = total.max(1);
    BigRational::new(BigInt::from(inside) * 4, BigInt::from(total))
}

/// Returns `|a - b|` exactly.
pub fn abs_delta(a: &BigRational, b: &BigRational) -> BigRational {
    (a - b).abs()
}

/// Returns the throughput of `samples` over `elapsed`, in thousands of
/// samples per second.
///
/// An elapsed time below one nanosecond is treated as one nanosecond.
pub fn throughput_thousands(samples: u64, elapsed: Duration) -> BigRational {
    let nanos = elapsed.as_nanos().max(1);
    BigRational::new(BigInt::from(samples) * NANOS_PER_MILLI, BigInt::from(nanos))
}

/// Renders `value` as a decimal string with exactly `digits` fractional
/// digits.
///
/// The last digit is rounded to nearest, halves away from zero. With
/// `digits == 0` the result is an integer with no decimal point.
///
/// # Examples
///
/// ```rust
/// use num_rational::BigRational;
/// use pi_engine::ratio::format_decimal;
///
/// let two_thirds = BigRational::new(2.into(), 3.into());
/// assert_eq!(format_decimal(&two_thirds, 4), "0.6667");
/// assert_eq!(format_decimal(&two_thirds, 0), "1");
/// ```
pub fn format_decimal(value: &BigRational, digits: usize) -> String {
    let scale = num_traits::pow(BigInt::from(10u32), digits);
    let scaled = value.numer().abs() * &scale;
    let denom = value.denom();

    let mut quotient = &scaled / denom;
    let remainder = &scaled % denom;
    if remainder * 2u32 >= *denom {
        quotient += 1u32;
    }

    let whole = &quotient / &scale;
    let sign = if value.is_negative() { "-" } else { "" };

    if digits == 0 {
        return format!("{sign}{whole}");
    }
    let fraction = (&quotient % &scale).to_string();
    format!("{sign}{whole}.{fraction:0>digits$}")
}

/// Lossy conversion for diagnostics and tests; never used for reported values.
pub fn to_f64(value: &BigRational) -> f64 {
    num_traits::ToPrimitive::to_f64(value).unwrap_or(f64::NAN)
}
