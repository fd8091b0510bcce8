//! Time source trait
//!
//! The frame loop reads time and sleeps only through this trait, so tests
//! can drive it with a simulated clock.

/// Monotonic millisecond clock with blocking sleep
pub trait Clock {
    /// Milliseconds since an arbitrary fixed epoch; never decreases
    fn now_ms(&self) -> u64;

    /// Block the caller for `ms` milliseconds
    fn sleep_ms(&mut self, ms: u64);
}
