//! Incremental pi approximation
//!
//! The series engine owns no timing; it only advances by whole terms.

pub mod digits;
pub mod engine;

pub use digits::{stable_digits, MAX_STABLE_DIGITS};
pub use engine::{Approximation, SeriesEngine, SeriesState};
