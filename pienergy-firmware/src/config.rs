//! Board configuration
//!
//! Pin assignments for the reference RP2040 board with a 64x128 SH1107
//! module on SPI1:
//!
//! | Signal | GPIO |
//! |--------|------|
//! | SCK    | 10   |
//! | MOSI   | 11   |
//! | CS     | 9    |
//! | D/C    | 8    |
//! | RST    | 12   |
//!
//! The pins themselves are taken from the peripheral set in `main`; this
//! module holds the values that describe how they are driven.

use pienergy_core::config::{FrameConfig, Rotation};

/// SPI clock (mode 3)
pub const SPI_FREQUENCY_HZ: u32 = 20_000_000;

/// Module is mounted turned 90 degrees clockwise
pub const ROTATION: Rotation = Rotation::Clockwise;

/// Frame loop timing
pub const FRAME_CONFIG: FrameConfig = FrameConfig::DEFAULT;

/// Log a progress line every N frames (10 s at 10 fps)
pub const LOG_INTERVAL_FRAMES: u64 = 100;
