//! Frame output trait
//!
//! The scheduler hands each frame's statistics to a sink that paints them
//! and pushes the result to the panel.

/// Statistics shown for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// Frame counter since start (drives the spinner)
    pub frame: u64,
    /// Current estimate of pi
    pub estimate: f64,
    /// Stable digits of the estimate
    pub digits: u8,
    /// Run time since start (ms)
    pub elapsed_ms: u64,
    /// Digits per minute over the sliding window
    pub digits_per_minute: f64,
    /// Activity ratio in [0, 1]
    pub activity: f64,
}

/// Render target plus panel transfer
pub trait FrameSink {
    /// Error type for the panel transfer
    type Error;

    /// Clear the drawing surface and paint `stats` into it
    fn render(&mut self, stats: &FrameStats);

    /// Send the painted frame to the panel
    ///
    /// Must not return until the transfer has finished or failed.
    fn present(&mut self) -> Result<(), Self::Error>;
}
