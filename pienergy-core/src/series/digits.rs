//! Digit-stability estimate
//!
//! Heuristic only: the alternating series error is bounded by the next
//! term, so `floor(-log10(error))` leading digits are expected to be final.
//! It is not a proof that those digits are correct.

/// Upper bound on reported digits (f64 resolution)
pub const MAX_STABLE_DIGITS: u8 = 15;

/// Number of digits of the estimate expected to be stable
///
/// `error <= 0` (rounding at saturation) reports the maximum instead of
/// taking the log of zero or a negative value. NaN reports zero.
pub fn stable_digits(abs_error: f64) -> u8 {
    if abs_error <= 0.0 {
        return MAX_STABLE_DIGITS;
    }

    let digits = libm::floor(-libm::log10(abs_error));
    if digits.is_nan() || digits < 0.0 {
        0
    } else if digits > MAX_STABLE_DIGITS as f64 {
        MAX_STABLE_DIGITS
    } else {
        digits as u8
    }
}
