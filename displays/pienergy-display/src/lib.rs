//! Framebuffer and renderer for the Pi Energy statistics screen
//!
//! This crate provides:
//! - `MonoBitmap` page-packed monochrome bitmaps (logical and device sized)
//! - `PanelInterface` trait for the command/data panel bus
//! - `RotatingFramebuffer`, an `embedded-graphics` draw target that rotates
//!   the logical 128x64 surface onto the 64x128 panel and streams it out
//! - The statistics screen renderer
//!
//! # Architecture
//!
//! Rendering code only ever sees the landscape logical surface. On
//! `present()` the framebuffer rebuilds the portrait device bitmap from it
//! and writes all 16 pages through the panel interface. Panel drivers
//! implement `PanelInterface` with their bus-specific code.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod bitmap;
pub mod framebuffer;
pub mod renderer;

// Re-export key types
pub use backend::{PageStage, PanelInterface, PresentError};
pub use bitmap::{DeviceBitmap, LogicalBitmap, MonoBitmap};
pub use framebuffer::RotatingFramebuffer;
pub use renderer::render_stats;
