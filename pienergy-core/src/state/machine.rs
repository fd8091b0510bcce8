//! State machine definition
//!
//! The frame loop has a single working state. It leaves `Running` only on
//! an external stop request or when the fault policy gives up.

use super::events::Event;

/// Scheduler states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Computing, rendering and presenting frames
    #[default]
    Running,
    /// Stopped by an external request at a tick boundary
    Stopped,
    /// Fault detected; rendering halted so nothing corrupt is shown
    Halted(FaultKind),
}

/// Types of faults that halt the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Panel bus kept failing
    BusFault,
}

impl State {
    /// Check if frames should be produced in this state
    pub fn is_running(&self) -> bool {
        matches!(self, State::Running)
    }

    /// Check if this is a fault state
    pub fn is_halted(&self) -> bool {
        matches!(self, State::Halted(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (Running, FramePresented) => Running,
            // A single failed frame is skipped, not fatal
            (Running, PresentFailed) => Running,
            (Running, FaultLimitReached(kind)) => Halted(kind),
            (Running, StopRequested) => Stopped,

            // Stopped and Halted are final for this run
            _ => self,
        }
    }
}
