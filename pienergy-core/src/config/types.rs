//! Configuration type definitions
//!
//! These types represent the build-time configuration of the frame loop and
//! the panel mounting. Values are picked once at startup and never change
//! during a run.

/// Frame loop timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameConfig {
    /// Target frame rate (render and bus cadence)
    pub target_fps: u32,
    /// Series terms computed per frame
    ///
    /// Sets the compute-vs-render balance inside one frame budget.
    pub terms_per_frame: u32,
    /// Length of the digits-per-minute window (ms)
    pub rate_window_ms: u64,
    /// Run time before a digits-per-minute value is reported (ms)
    ///
    /// Suppresses the rate during startup transients.
    pub rate_min_valid_ms: u64,
}

impl FrameConfig {
    /// Reference hardware timing: 10 fps, 7000 terms per frame
    pub const DEFAULT: Self = Self {
        target_fps: 10,
        terms_per_frame: 7000,
        rate_window_ms: 60_000,
        rate_min_valid_ms: 10_000,
    };

    /// Target frame period in whole milliseconds
    ///
    /// A zero frame rate is treated as 1 fps.
    pub const fn frame_period_ms(&self) -> u64 {
        let fps = if self.target_fps == 0 {
            1
        } else {
            self.target_fps
        };
        (1000 / fps) as u64
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Physical mounting of the panel relative to the drawing surface
///
/// The panel has no hardware rotation, so the framebuffer rotates each
/// logical pixel by 90 degrees before streaming pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Panel turned 90 degrees clockwise
    #[default]
    Clockwise,
    /// Panel turned 90 degrees counter-clockwise
    CounterClockwise,
}
