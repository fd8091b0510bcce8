//! Fixed-rate frame scheduler
//!
//! One `tick()` is one frame:
//!
//! 1. record the frame start
//! 2. advance the series by the fixed quantum
//! 3. estimate stable digits
//! 4. update telemetry
//! 5. render the statistics
//! 6. present to the panel
//! 7. sleep for whatever is left of the frame period
//!
//! A frame that overruns its period is followed immediately by the next
//! one with no catch-up, so the loop drifts behind wall-clock schedule
//! instead of bunching frames. There is no external deadline to honor.
//!
//! # Fault policy
//!
//! A failed present aborts the rest of that frame; the next frame
//! re-addresses every page from scratch, so nothing is retried in place.
//! After [`MAX_CONSECUTIVE_FAULTS`] failed frames in a row the scheduler
//! halts and stops touching the panel.

use core::ops::ControlFlow;

use crate::config::FrameConfig;
use crate::series::{stable_digits, SeriesEngine};
use crate::state::{Event, FaultKind, State};
use crate::telemetry::{TelemetryReport, TelemetryTracker};
use crate::traits::{Clock, FrameSink, FrameStats};

/// Failed frames in a row before the loop halts
pub const MAX_CONSECUTIVE_FAULTS: u8 = 3;

/// Wall-clock anchors of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameClock {
    /// Start of the run (ms); never reset
    pub start_of_run_ms: u64,
    /// Start of the most recent frame (ms)
    pub last_frame_ms: u64,
}

/// Result of a completed frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameReport {
    /// What was drawn
    pub stats: FrameStats,
    /// Telemetry for this frame
    pub telemetry: TelemetryReport,
    /// Time spent computing, rendering and presenting (ms)
    pub busy_ms: u64,
    /// Time slept to reach the frame period (ms)
    pub slept_ms: u64,
}

/// Why a tick produced no frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickError<E> {
    /// Panel transfer failed; the frame was skipped
    Present(E),
    /// Loop is halted by a fault
    Halted(FaultKind),
    /// Loop was stopped by request
    Stopped,
}

/// Frame loop state
pub struct FrameScheduler<C, S> {
    clock: C,
    sink: S,
    config: FrameConfig,
    series: SeriesEngine,
    telemetry: TelemetryTracker,
    state: State,
    anchors: FrameClock,
    /// Frames attempted so far
    frame: u64,
    consecutive_faults: u8,
}

impl<C: Clock, S: FrameSink> FrameScheduler<C, S> {
    /// Create a scheduler; the run starts now
    pub fn new(clock: C, sink: S, config: FrameConfig) -> Self {
        Self::with_series(clock, sink, config, SeriesEngine::new())
    }

    /// Create a scheduler continuing an existing series
    pub fn with_series(clock: C, sink: S, config: FrameConfig, series: SeriesEngine) -> Self {
        let start = clock.now_ms();
        Self {
            telemetry: TelemetryTracker::new(start, &config),
            clock,
            sink,
            config,
            series,
            state: State::Running,
            anchors: FrameClock {
                start_of_run_ms: start,
                last_frame_ms: start,
            },
            frame: 0,
            consecutive_faults: 0,
        }
    }

    /// Run one frame
    ///
    /// Does nothing once the loop has stopped or halted.
    pub fn tick(&mut self) -> Result<FrameReport, TickError<S::Error>> {
        match self.state {
            State::Running => {}
            State::Stopped => return Err(TickError::Stopped),
            State::Halted(kind) => return Err(TickError::Halted(kind)),
        }

        let frame_start = self.clock.now_ms();
        self.anchors.last_frame_ms = frame_start;

        let terms = self.config.terms_per_frame;
        let approx = self.series.advance(terms);
        let digits = stable_digits(approx.abs_error);

        let now = self.clock.now_ms();
        let telemetry = self.telemetry.update(now, terms, digits);

        let stats = FrameStats {
            frame: self.frame,
            estimate: approx.estimate,
            digits,
            elapsed_ms: now.saturating_sub(self.anchors.start_of_run_ms),
            digits_per_minute: telemetry.digits_per_minute,
            activity: telemetry.activity,
        };
        self.frame = self.frame.saturating_add(1);

        self.sink.render(&stats);
        let presented = self.sink.present();
        self.record_present(presented.is_ok());

        let busy_ms = self.clock.now_ms().saturating_sub(frame_start);
        let slept_ms = if self.state.is_running() {
            self.pace(busy_ms)
        } else {
            0
        };

        match presented {
            Ok(()) => Ok(FrameReport {
                stats,
                telemetry,
                busy_ms,
                slept_ms,
            }),
            Err(e) => Err(TickError::Present(e)),
        }
    }

    /// Apply the fault policy to the outcome of a present
    fn record_present(&mut self, ok: bool) {
        if ok {
            self.consecutive_faults = 0;
            self.state = self.state.transition(Event::FramePresented);
            return;
        }

        self.consecutive_faults = self.consecutive_faults.saturating_add(1);
        self.state = self.state.transition(Event::PresentFailed);
        if self.consecutive_faults >= MAX_CONSECUTIVE_FAULTS {
            self.state = self
                .state
                .transition(Event::FaultLimitReached(FaultKind::BusFault));
        }
    }

    /// Sleep out the rest of the frame period; returns the time slept
    fn pace(&mut self, busy_ms: u64) -> u64 {
        let period = self.config.frame_period_ms();
        if busy_ms < period {
            let remaining = period - busy_ms;
            self.clock.sleep_ms(remaining);
            remaining
        } else {
            0
        }
    }

    /// Run frames until stopped or halted
    ///
    /// `on_frame` sees every tick result and is the only stop check; it
    /// runs between ticks, never during a panel transfer. Returns the final
    /// state.
    pub fn run<F>(&mut self, mut on_frame: F) -> State
    where
        F: FnMut(&Result<FrameReport, TickError<S::Error>>) -> ControlFlow<()>,
    {
        while self.state.is_running() {
            let result = self.tick();
            if on_frame(&result).is_break() {
                self.request_stop();
            }
        }
        self.state
    }

    /// Ask the loop to stop at the next tick boundary
    pub fn request_stop(&mut self) {
        self.state = self.state.transition(Event::StopRequested);
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Wall-clock anchors
    pub fn anchors(&self) -> FrameClock {
        self.anchors
    }

    /// Frames attempted so far
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Present failures since the last successful frame
    pub fn consecutive_faults(&self) -> u8 {
        self.consecutive_faults
    }

    /// Series engine
    pub fn series(&self) -> &SeriesEngine {
        &self.series
    }

    /// Telemetry tracker
    pub fn telemetry(&self) -> &TelemetryTracker {
        &self.telemetry
    }

    /// Frame configuration
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Time source
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Frame sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Frame sink (mutable)
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
