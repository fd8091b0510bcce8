//! Display panel drivers

pub mod sh1107;

pub use sh1107::{hard_reset, Sh1107Error, Sh1107Spi, INIT_SEQUENCE};
