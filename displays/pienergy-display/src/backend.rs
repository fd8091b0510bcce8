//! Panel bus interface
//!
//! Defines the interface between the framebuffer and a panel driver.

/// Command/data bus to a page-addressed panel
///
/// Each call is one discrete transfer. Implementations select command or
/// data mode for the transfer and hold chip select only while it runs.
pub trait PanelInterface {
    /// Bus error type
    type Error;

    /// Send a single command byte
    fn write_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send a burst of display data
    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// Step of a page write that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageStage {
    /// Page address command
    PageSelect,
    /// Low column nibble command
    ColumnLow,
    /// High column nibble command
    ColumnHigh,
    /// Page data burst
    Data,
}

/// Present failure; the rest of the frame was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PresentError<E> {
    /// Device page being written
    pub page: u8,
    /// Step that failed
    pub stage: PageStage,
    /// Underlying bus error
    pub source: E,
}
