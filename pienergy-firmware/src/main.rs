//! Pi Energy - Nilakantha pi on a rotated OLED
//!
//! Main firmware binary for RP2040-based boards. Brings up the SH1107 panel
//! on SPI1 and runs the frame loop forever: a fixed block of series terms,
//! a statistics screen, one full panel refresh, then sleep to the next
//! frame.

#![no_std]
#![no_main]

use core::ops::ControlFlow;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{self, Spi};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use pienergy_core::scheduler::{FrameScheduler, TickError};
use pienergy_core::state::State;
use pienergy_display::RotatingFramebuffer;
use pienergy_drivers::display::{hard_reset, Sh1107Spi};

use crate::clock::EmbassyClock;

mod clock;
mod config;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Pi Energy firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // SPI1 in mode 3, transmit only (the panel is write-only)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = config::SPI_FREQUENCY_HZ;
    spi_config.polarity = spi::Polarity::IdleHigh;
    spi_config.phase = spi::Phase::CaptureOnSecondTransition;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);

    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::Low);
    let mut rst = Output::new(p.PIN_12, Level::High);

    unwrap!(hard_reset(&mut rst, &mut Delay));

    let mut panel = Sh1107Spi::new(spi, cs, dc);
    if let Err(e) = panel.init() {
        error!("Panel init failed: {}", e);
        park().await;
    }
    info!("SH1107 initialized");

    let framebuffer = RotatingFramebuffer::new(panel, config::ROTATION);
    let mut scheduler = FrameScheduler::new(EmbassyClock, framebuffer, config::FRAME_CONFIG);
    info!(
        "Frame loop: {} fps, {} terms/frame",
        config::FRAME_CONFIG.target_fps,
        config::FRAME_CONFIG.terms_per_frame
    );

    let final_state = scheduler.run(|result| {
        match result {
            Ok(report) => {
                if report.telemetry.raw_digits_per_minute < 0.0 {
                    warn!(
                        "Digit count went backwards: {} digits/min",
                        report.telemetry.raw_digits_per_minute
                    );
                }
                if report.stats.frame % config::LOG_INTERVAL_FRAMES == 0 {
                    info!(
                        "frame={} digits={} digits/min={} activity={} busy={}ms",
                        report.stats.frame,
                        report.stats.digits,
                        report.stats.digits_per_minute,
                        report.stats.activity,
                        report.busy_ms
                    );
                }
            }
            Err(TickError::Present(e)) => warn!("Frame skipped, panel write failed: {}", e),
            Err(TickError::Halted(kind)) => error!("Frame loop halted: {}", kind),
            Err(TickError::Stopped) => {}
        }
        ControlFlow::Continue(())
    });

    match final_state {
        State::Halted(kind) => error!("Display halted after repeated bus faults: {}", kind),
        state => info!("Frame loop exited: {}", state),
    }

    park().await;
}

/// Nothing left to drive; keep the executor alive for RTT
async fn park() -> ! {
    loop {
        embassy_time::Timer::after_secs(60).await;
    }
}
