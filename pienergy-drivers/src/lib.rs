//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pienergy-display for panel hardware:
//!
//! - SH1107 OLED over 4-wire SPI (command/data pin, chip select)
//! - Panel hard reset sequencing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
