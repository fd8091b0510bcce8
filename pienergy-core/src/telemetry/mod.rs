//! Per-frame telemetry
//!
//! Smoothed throughput, normalized activity, and a sliding-window
//! digits-per-minute rate.

pub mod tracker;
pub mod window;

pub use tracker::{TelemetryReport, TelemetryTracker};
pub use window::{RateWindow, WINDOW_CAPACITY};
