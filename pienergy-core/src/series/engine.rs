//! Nilakantha series engine
//!
//! pi = 3 + 4/(2*3*4) - 4/(4*5*6) + 4/(6*7*8) - ...
//!
//! The engine keeps only the running estimate, the next even index and the
//! sign of the next term, so advancing by `a` then `b` terms is the same as
//! advancing by `a + b`.

use core::f64::consts::PI;

/// Series state between invocations
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeriesState {
    /// Current approximation of pi
    estimate: f64,
    /// Even index `n` of the next term (starts at 2)
    next_index: u64,
    /// Sign of the next term (+1.0 or -1.0)
    sign: f64,
    /// Total terms added since start
    terms: u64,
}

impl Default for SeriesState {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesState {
    /// Initial state: estimate 3.0, n = 2, positive first term
    pub const fn new() -> Self {
        Self {
            estimate: 3.0,
            next_index: 2,
            sign: 1.0,
            terms: 0,
        }
    }

    /// Rebuild a state from its parts (for replay and tests)
    ///
    /// `next_index` is rounded down to an even value of at least 2, and any
    /// non-negative `sign` is treated as positive.
    pub fn from_parts(estimate: f64, next_index: u64, sign: f64) -> Self {
        let next_index = (next_index & !1).max(2);
        Self {
            estimate,
            next_index,
            sign: if sign < 0.0 { -1.0 } else { 1.0 },
            terms: (next_index - 2) / 2,
        }
    }

    /// Current approximation of pi
    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    /// Even index of the next term
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Sign of the next term
    pub fn sign(&self) -> f64 {
        self.sign
    }

    /// Number of terms added so far
    pub fn terms(&self) -> u64 {
        self.terms
    }
}

/// Result of one `advance` call
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Approximation {
    /// Current approximation of pi
    pub estimate: f64,
    /// |estimate - pi|
    pub abs_error: f64,
}

/// Incremental pi engine
#[derive(Debug, Clone, Default)]
pub struct SeriesEngine {
    state: SeriesState,
}

impl SeriesEngine {
    /// Create an engine at the start of the series
    pub const fn new() -> Self {
        Self {
            state: SeriesState::new(),
        }
    }

    /// Create an engine continuing from a saved state
    pub const fn with_state(state: SeriesState) -> Self {
        Self { state }
    }

    /// Current series state
    pub fn state(&self) -> &SeriesState {
        &self.state
    }

    /// Add exactly `quantum` terms and return the new approximation
    ///
    /// The denominator is evaluated in f64: n^3 leaves the u64 range long
    /// before the series stops improving. Once terms drop below the
    /// estimate's resolution the estimate stops moving, which is the
    /// expected asymptote rather than an error.
    pub fn advance(&mut self, quantum: u32) -> Approximation {
        let s = &mut self.state;

        for _ in 0..quantum {
            let n = s.next_index as f64;
            s.estimate += s.sign * (4.0 / (n * (n + 1.0) * (n + 2.0)));
            s.sign = -s.sign;
            // Saturation needs 2^62 terms; those terms are far below f64 resolution
            s.next_index = s.next_index.saturating_add(2);
            s.terms = s.terms.saturating_add(1);
        }

        self.approximation()
    }

    /// Current approximation without advancing
    pub fn approximation(&self) -> Approximation {
        let estimate = self.state.estimate;
        Approximation {
            estimate,
            abs_error: libm::fabs(estimate - PI),
        }
    }
}
