//! Telemetry tracker
//!
//! Consumes one sample per frame and produces:
//!
//! - an EMA of series throughput (terms per second)
//! - an activity ratio: EMA over a slowly decaying peak, in [0, 1]
//! - a digits-per-minute rate over a sliding time window

use super::window::RateWindow;
use crate::config::FrameConfig;

/// EMA weight of the previous value
const EMA_KEEP: f64 = 0.8;

/// EMA weight of the new sample
const EMA_GAIN: f64 = 0.2;

/// Per-update decay applied to the peak
const PEAK_DECAY: f64 = 0.995;

/// Floor for the peak, avoids blow-up before throughput is known
const PEAK_FLOOR: f64 = 1.0;

/// Smallest elapsed time between updates (s)
///
/// Coarse clocks can report two frames at the same millisecond.
const MIN_ELAPSED_S: f64 = 1e-6;

/// Output of one telemetry update
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryReport {
    /// Smoothed throughput (terms per second)
    pub ema_rate: f64,
    /// Smoothed throughput relative to the decaying peak, in [0, 1]
    pub activity: f64,
    /// Digit growth rate for display, never negative
    pub digits_per_minute: f64,
    /// Digit growth rate before the display floor
    ///
    /// Digits only ever grow, so a negative value here means a bug upstream.
    pub raw_digits_per_minute: f64,
}

/// Incremental telemetry state
#[derive(Debug, Clone)]
pub struct TelemetryTracker {
    /// Start of the run (ms)
    start_ms: u64,
    /// Time of the previous update (ms)
    last_update_ms: u64,
    /// Smoothed terms per second; `None` until the first sample
    ema_rate: Option<f64>,
    /// Decaying running maximum of `ema_rate`
    decaying_peak: f64,
    /// Run time before digits per minute are reported (ms)
    min_valid_ms: u64,
    /// Recent (timestamp, digits) samples
    window: RateWindow,
}

impl TelemetryTracker {
    /// Create a tracker for a run starting at `start_ms`
    pub fn new(start_ms: u64, config: &FrameConfig) -> Self {
        Self {
            start_ms,
            last_update_ms: start_ms,
            ema_rate: None,
            decaying_peak: PEAK_FLOOR,
            min_valid_ms: config.rate_min_valid_ms,
            window: RateWindow::new(config.rate_window_ms),
        }
    }

    /// Feed one frame's sample
    ///
    /// # Arguments
    /// - `now_ms`: current time, not earlier than the previous update
    /// - `terms`: series terms computed since the previous update
    /// - `digits`: stable digits right now
    pub fn update(&mut self, now_ms: u64, terms: u32, digits: u8) -> TelemetryReport {
        let ema_rate = self.update_rate(now_ms, terms);
        let activity = self.update_peak(ema_rate);
        let raw = self.update_window(now_ms, digits);

        TelemetryReport {
            ema_rate,
            activity,
            digits_per_minute: if raw > 0.0 { raw } else { 0.0 },
            raw_digits_per_minute: raw,
        }
    }

    /// Instantaneous throughput folded into the EMA
    fn update_rate(&mut self, now_ms: u64, terms: u32) -> f64 {
        let elapsed_ms = now_ms.saturating_sub(self.last_update_ms);
        let elapsed_s = (elapsed_ms as f64 / 1000.0).max(MIN_ELAPSED_S);
        self.last_update_ms = now_ms;

        let rate = terms as f64 / elapsed_s;
        let ema = match self.ema_rate {
            None => rate,
            Some(prev) => EMA_KEEP * prev + EMA_GAIN * rate,
        };
        self.ema_rate = Some(ema);
        ema
    }

    /// Raise the peak to the EMA, decay it, and normalize
    ///
    /// The decay runs after the max on every update, so right after a new
    /// high the peak sits 0.5% under the EMA; the ratio is clamped to 1.
    fn update_peak(&mut self, ema_rate: f64) -> f64 {
        if ema_rate > self.decaying_peak {
            self.decaying_peak = ema_rate;
        }
        self.decaying_peak = (self.decaying_peak * PEAK_DECAY).max(PEAK_FLOOR);

        let ratio = ema_rate / self.decaying_peak.max(PEAK_FLOOR);
        ratio.clamp(0.0, 1.0)
    }

    /// Record the sample and compute digits per minute over the window
    ///
    /// Returns 0 during the startup guard or with fewer than two samples.
    fn update_window(&mut self, now_ms: u64, digits: u8) -> f64 {
        self.window.push(now_ms, digits);

        let run_ms = now_ms.saturating_sub(self.start_ms);
        if run_ms <= self.min_valid_ms || self.window.len() <= 1 {
            return 0.0;
        }

        let Some(oldest) = self.window.oldest() else {
            return 0.0;
        };
        let span_ms = now_ms.saturating_sub(oldest.timestamp_ms);
        if span_ms == 0 {
            return 0.0;
        }

        (digits as f64 - oldest.digits as f64) * 60_000.0 / span_ms as f64
    }

    /// Smoothed throughput, if any sample has been seen
    pub fn ema_rate(&self) -> Option<f64> {
        self.ema_rate
    }

    /// Current decaying peak (never below 1.0)
    pub fn decaying_peak(&self) -> f64 {
        self.decaying_peak
    }

    /// Start of the run (ms)
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Sample window
    pub fn window(&self) -> &RateWindow {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tracker() -> TelemetryTracker {
        TelemetryTracker::new(0, &FrameConfig::DEFAULT)
    }

    #[test]
    fn test_first_sample_sets_ema() {
        let mut t = tracker();
        let report = t.update(100, 7000, 5);
        assert!((report.ema_rate - 70_000.0).abs() < 1e-6);
        assert_eq!(t.ema_rate(), Some(report.ema_rate));
    }

    #[test]
    fn test_ema_smoothing() {
        let mut t = tracker();
        t.update(100, 7000, 5); // 70k/s
        let report = t.update(200, 3500, 5); // 35k/s
        assert!((report.ema_rate - (0.8 * 70_000.0 + 0.2 * 35_000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_elapsed_uses_epsilon() {
        let mut t = tracker();
        let report = t.update(0, 1, 0);
        assert!(report.ema_rate.is_finite());
        assert!((report.ema_rate - 1e6).abs() < 1e-3);
    }

    #[test]
    fn test_peak_decays_and_floors() {
        let mut t = tracker();
        t.update(100, 7000, 5);
        let peak = t.decaying_peak();
        assert!((peak - 70_000.0 * 0.995).abs() < 1e-6);

        // Throughput stops; the peak relaxes but not below 1.0
        let mut now = 100;
        for _ in 0..20_000 {
            now += 100;
            t.update(now, 0, 5);
        }
        assert_eq!(t.decaying_peak(), 1.0);
    }

    #[test]
    fn test_activity_full_at_new_high() {
        let mut t = tracker();
        let report = t.update(100, 7000, 5);
        assert_eq!(report.activity, 1.0);
    }

    #[test]
    fn test_activity_drops_with_throughput() {
        let mut t = tracker();
        let mut now = 0;
        for _ in 0..50 {
            now += 100;
            t.update(now, 7000, 5);
        }
        let report = (1..=11)
            .map(|i| t.update(now + i * 100, 700, 5))
            .last()
            .unwrap();
        assert!(report.activity < 0.5);
        assert!(report.activity > 0.0);
    }

    #[test]
    fn test_activity_recovers_after_peak_relaxes() {
        let mut t = tracker();
        let mut now = 0;
        for _ in 0..20 {
            now += 100;
            t.update(now, 10_000, 5);
        }
        // Sustained lower load: the peak decays towards it
        t.update(now, 0, 5);
        let report = (1..=2000)
            .map(|i| t.update(now + i * 100, 1000, 5))
            .last()
            .unwrap();
        assert!(report.activity > 0.95);
    }

    #[test]
    fn test_rate_zero_during_startup() {
        let mut t = tracker();
        let mut now = 0;
        let mut digits = 0u8;
        while now < 10_000 {
            now += 100;
            digits = digits.saturating_add(1).min(15);
            let report = t.update(now, 7000, digits);
            assert_eq!(report.digits_per_minute, 0.0);
            assert_eq!(report.raw_digits_per_minute, 0.0);
        }
    }

    #[test]
    fn test_rate_after_startup() {
        let mut t = tracker();
        // One digit every second for 20 s
        for second in 0..=20u64 {
            t.update(second * 1000, 7000, second as u8 / 2);
        }
        let report = t.update(21_000, 7000, 10);
        // Window spans 0..21000 ms, digits 0..10 => 10 * 60000 / 21000
        let expected = 10.0 * 60_000.0 / 21_000.0;
        assert!((report.digits_per_minute - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rate_uses_window_start() {
        let config = FrameConfig::DEFAULT;
        let mut t = TelemetryTracker::new(0, &config);
        let mut digits = 0u8;
        for i in 0..=900u64 {
            if i % 60 == 0 {
                digits = digits.saturating_add(1).min(15);
            }
            t.update(i * 100, 7000, digits);
        }
        let now = 90_000;

        let oldest = *t.window().oldest().unwrap();
        assert_eq!(oldest.timestamp_ms, now - 60_000);

        let report = t.update(now + 100, 7000, digits);
        let oldest = *t.window().oldest().unwrap();
        let expected = (digits as f64 - oldest.digits as f64) * 60_000.0
            / (now + 100 - oldest.timestamp_ms) as f64;
        assert!((report.digits_per_minute - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rate_flat_digits_is_zero() {
        let mut t = tracker();
        t.update(0, 0, 15);
        let report = (1..=200u64)
            .map(|i| t.update(i * 100, 7000, 15))
            .last()
            .unwrap();
        assert_eq!(report.digits_per_minute, 0.0);
        assert_eq!(report.raw_digits_per_minute, 0.0);
    }

    #[test]
    fn test_negative_rate_is_floored_but_visible() {
        let mut t = tracker();
        t.update(0, 0, 10);
        let report = t.update(20_000, 0, 5);
        assert!(report.raw_digits_per_minute < 0.0);
        assert_eq!(report.digits_per_minute, 0.0);
    }

    #[test]
    fn test_rate_needs_two_samples() {
        let mut t = tracker();
        // First update already beyond the startup guard
        let report = t.update(30_000, 7000, 12);
        assert_eq!(report.digits_per_minute, 0.0);
    }

    /// Deterministic pseudo-random sequence (xorshift64)
    fn xorshift(state: &mut u64) -> u64 {
        let mut x = *state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        *state = x;
        x
    }

    #[test]
    fn test_activity_bounded_over_long_run() {
        const SEED_PEAK: u32 = 7000;
        let mut t = tracker();
        let mut rng = 0x9E37_79B9_7F4A_7C15u64;
        let mut now = 0;

        // Seed a peak
        for _ in 0..10 {
            now += 100;
            t.update(now, SEED_PEAK, 5);
        }

        for _ in 0..10_000 {
            now += 100;
            let terms = (xorshift(&mut rng) % (10 * SEED_PEAK as u64 + 1)) as u32;
            let report = t.update(now, terms, 5);
            assert!((0.0..=1.0).contains(&report.activity));
            assert!(t.decaying_peak() >= 1.0);
        }
    }

    proptest! {
        #[test]
        fn prop_activity_in_unit_range(
            frames in proptest::collection::vec((0u32..70_000, 0u64..250), 1..500)
        ) {
            let mut t = tracker();
            let mut now = 0;
            for (terms, step) in frames {
                now += step;
                let report = t.update(now, terms, 5);
                prop_assert!(report.activity >= 0.0 && report.activity <= 1.0);
                prop_assert!(report.digits_per_minute >= 0.0);
                prop_assert!(t.decaying_peak() >= 1.0);
            }
        }
    }
}
