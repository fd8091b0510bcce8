//! Frame scheduler
//!
//! Ties the series engine, telemetry and display together at a fixed
//! frame rate.

pub mod frame;

pub use frame::{FrameClock, FrameReport, FrameScheduler, TickError, MAX_CONSECUTIVE_FAULTS};
