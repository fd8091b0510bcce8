//! Scheduler state machine
//!
//! Defines the run states and the events that move between them.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{FaultKind, State};
