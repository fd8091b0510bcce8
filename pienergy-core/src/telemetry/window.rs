//! Sliding time window of digit samples
//!
//! Samples arrive in increasing timestamp order, so a front-truncated deque
//! is enough; no time index is needed.

use heapless::Deque;

/// Maximum samples held in the window
///
/// A 60 s window at 10 fps holds 600 samples.
pub const WINDOW_CAPACITY: usize = 1024;

/// One (timestamp, digit count) sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitSample {
    /// Sample time (ms since an arbitrary monotonic epoch)
    pub timestamp_ms: u64,
    /// Stable digits at that time
    pub digits: u8,
}

/// Ring of recent samples spanning at most `span_ms`
#[derive(Debug, Clone)]
pub struct RateWindow {
    samples: Deque<DigitSample, WINDOW_CAPACITY>,
    span_ms: u64,
}

impl RateWindow {
    /// Create an empty window covering `span_ms`
    pub const fn new(span_ms: u64) -> Self {
        Self {
            samples: Deque::new(),
            span_ms,
        }
    }

    /// Append a sample and evict everything older than `now - span`
    ///
    /// If the ring is full the oldest sample is dropped to make room, which
    /// only shortens the effective horizon.
    pub fn push(&mut self, now_ms: u64, digits: u8) {
        if self.samples.is_full() {
            self.samples.pop_front();
        }
        // Cannot fail: a slot was freed above if needed
        let _ = self.samples.push_back(DigitSample {
            timestamp_ms: now_ms,
            digits,
        });
        self.evict(now_ms);
    }

    /// Drop samples with `timestamp < now - span`
    fn evict(&mut self, now_ms: u64) {
        let cutoff = now_ms.saturating_sub(self.span_ms);
        while let Some(oldest) = self.samples.front() {
            if oldest.timestamp_ms < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Oldest sample still in the window
    pub fn oldest(&self) -> Option<&DigitSample> {
        self.samples.front()
    }

    /// Newest sample
    pub fn newest(&self) -> Option<&DigitSample> {
        self.samples.back()
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if no samples are held
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Window length in milliseconds
    pub fn span_ms(&self) -> u64 {
        self.span_ms
    }

    /// Iterate samples oldest first
    pub fn iter(&self) -> impl Iterator<Item = &DigitSample> {
        self.samples.iter()
    }
}
