//! Hardware abstraction traits
//!
//! These traits define the interface between the frame loop
//! and hardware-specific implementations.

pub mod clock;
pub mod sink;

pub use clock::Clock;
pub use sink::{FrameSink, FrameStats};
