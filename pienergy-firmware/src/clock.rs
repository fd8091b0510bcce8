//! Embassy-backed frame clock
//!
//! The frame loop runs synchronously inside the main task, so pacing uses a
//! busy wait instead of an awaited timer.

use embassy_time::{block_for, Duration, Instant};
use pienergy_core::traits::Clock;

/// Clock over the embassy time driver
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    fn sleep_ms(&mut self, ms: u64) {
        block_for(Duration::from_millis(ms));
    }
}
