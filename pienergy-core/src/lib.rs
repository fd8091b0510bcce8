//! Board-agnostic core logic for the Pi Energy firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Nilakantha series engine and digit-stability estimate
//! - Telemetry tracking (EMA throughput, decaying peak, digits per minute)
//! - Fixed-rate frame scheduler and its state machine
//! - Clock and frame sink traits
//! - Timing configuration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod scheduler;
pub mod series;
pub mod state;
pub mod telemetry;
pub mod traits;
