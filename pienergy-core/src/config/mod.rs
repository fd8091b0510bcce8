//! Configuration types
//!
//! Timing is fixed at build time; nothing here is tunable while running.

pub mod types;

pub use types::{FrameConfig, Rotation};
