//! Events that trigger state transitions

use super::machine::FaultKind;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Frame events
    /// Frame reached the panel
    FramePresented,
    /// Panel transfer failed for this frame
    PresentFailed,
    /// Too many consecutive failures of one kind
    FaultLimitReached(FaultKind),

    // External control
    /// Stop requested between ticks
    StopRequested,
}
