//! SH1107 OLED driver (4-wire SPI)
//!
//! Driver for 64x128 SH1107-based OLED panels on a write-only SPI bus.
//!
//! # Bus Protocol
//!
//! - D/C low selects command mode, high selects data mode
//! - CS is active low and held only for the duration of one transfer
//! - Commands are sent one byte per transfer; a page of display data is one
//!   64-byte burst
//!
//! The panel has no hardware rotation that suits a landscape layout, so
//! rotation is done in the framebuffer before the data reaches this driver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use pienergy_display::PanelInterface;

/// SH1107 commands used by the init sequence
pub mod cmd {
    /// Panel off (sleep)
    pub const DISPLAY_OFF: u8 = 0xAE;
    /// Panel on
    pub const DISPLAY_ON: u8 = 0xAF;
    /// Display start line (+ 1 byte)
    pub const SET_START_LINE: u8 = 0xDC;
    /// Contrast (+ 1 byte)
    pub const SET_CONTRAST: u8 = 0x81;
    /// Segment remap off
    pub const SET_SEG_NORMAL: u8 = 0xA0;
    /// COM scan direction, row 0 first
    pub const SET_COM_SCAN_INC: u8 = 0xC0;
    /// Multiplex ratio (+ 1 byte)
    pub const SET_MUX_RATIO: u8 = 0xA8;
    /// Display offset (+ 1 byte)
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    /// Oscillator frequency and clock divide (+ 1 byte)
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    /// Pre-charge / discharge periods (+ 1 byte)
    pub const SET_PRECHARGE: u8 = 0xD9;
    /// VCOM deselect level (+ 1 byte)
    pub const SET_VCOM_DESELECT: u8 = 0xDB;
    /// DC-DC converter control (+ 1 byte)
    pub const SET_DCDC: u8 = 0xAD;
    /// Show RAM contents
    pub const RESUME_FROM_RAM: u8 = 0xA4;
    /// Non-inverted pixels
    pub const SET_NORMAL: u8 = 0xA6;
}

/// Power-up sequence for the reference 64x128 module
///
/// Sent as single-byte command transfers, parameters included.
pub const INIT_SEQUENCE: [u8; 22] = [
    cmd::DISPLAY_OFF,
    cmd::SET_START_LINE,
    0x00,
    cmd::SET_CONTRAST,
    0x7F,
    cmd::SET_SEG_NORMAL,
    cmd::SET_COM_SCAN_INC,
    cmd::SET_MUX_RATIO,
    0x7F, // 128 rows
    cmd::SET_DISPLAY_OFFSET,
    0x60,
    cmd::SET_CLOCK_DIV,
    0x51,
    cmd::SET_PRECHARGE,
    0x22,
    cmd::SET_VCOM_DESELECT,
    0x35,
    cmd::SET_DCDC,
    0x8A,
    cmd::RESUME_FROM_RAM,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

/// Reset pin timing (ms): idle high, pulse low, settle high
const RESET_IDLE_MS: u32 = 10;
const RESET_PULSE_MS: u32 = 20;
const RESET_SETTLE_MS: u32 = 20;

/// SH1107 bus errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sh1107Error<S, P> {
    /// SPI transfer failed
    Spi(S),
    /// CS or D/C pin could not be driven
    Pin(P),
}

/// Transfer mode selected by the D/C pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Command,
    Data,
}

/// SH1107 panel on a 4-wire SPI bus
pub struct Sh1107Spi<SPI, CS, DC> {
    spi: SPI,
    cs: CS,
    dc: DC,
}

impl<SPI, CS, DC> Sh1107Spi<SPI, CS, DC>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin<Error = CS::Error>,
{
    /// Wrap an SPI bus and the chip-select and data/command pins
    pub fn new(spi: SPI, cs: CS, dc: DC) -> Self {
        Self { spi, cs, dc }
    }

    /// Send the init sequence
    ///
    /// The panel must have been hard reset first.
    pub fn init(&mut self) -> Result<(), Sh1107Error<SPI::Error, CS::Error>> {
        self.cs.set_high().map_err(Sh1107Error::Pin)?;
        for &byte in INIT_SEQUENCE.iter() {
            self.transfer(Mode::Command, &[byte])?;
        }
        Ok(())
    }

    /// One chip-select framed transfer
    ///
    /// CS is released even when the SPI write fails.
    fn transfer(
        &mut self,
        mode: Mode,
        bytes: &[u8],
    ) -> Result<(), Sh1107Error<SPI::Error, CS::Error>> {
        let selected = match mode {
            Mode::Command => self.dc.set_low(),
            Mode::Data => self.dc.set_high(),
        };
        selected.map_err(Sh1107Error::Pin)?;

        self.cs.set_low().map_err(Sh1107Error::Pin)?;
        let written = self
            .spi
            .write(bytes)
            .and_then(|()| self.spi.flush())
            .map_err(Sh1107Error::Spi);
        let released = self.cs.set_high().map_err(Sh1107Error::Pin);

        written.and(released)
    }

    /// Give back the bus and pins
    pub fn release(self) -> (SPI, CS, DC) {
        (self.spi, self.cs, self.dc)
    }
}

impl<SPI, CS, DC> PanelInterface for Sh1107Spi<SPI, CS, DC>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin<Error = CS::Error>,
{
    type Error = Sh1107Error<SPI::Error, CS::Error>;

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.transfer(Mode::Command, &[command])
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.transfer(Mode::Data, data)
    }
}

/// Pulse the reset line: high 10 ms, low 20 ms, high 20 ms
pub fn hard_reset<RST, D>(rst: &mut RST, delay: &mut D) -> Result<(), RST::Error>
where
    RST: OutputPin,
    D: DelayNs,
{
    rst.set_high()?;
    delay.delay_ms(RESET_IDLE_MS);
    rst.set_low()?;
    delay.delay_ms(RESET_PULSE_MS);
    rst.set_high()?;
    delay.delay_ms(RESET_SETTLE_MS);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorKind, ErrorType};
    use pienergy_core::config::Rotation;
    use pienergy_display::{PageStage, PresentError, RotatingFramebuffer};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Everything the mocks saw, in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum BusEvent {
        Cs(bool),
        Dc(bool),
        Rst(bool),
        Write(Vec<u8>),
        Flush,
        DelayMs(u32),
    }

    type Log = Rc<RefCell<Vec<BusEvent>>>;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct MockSpiError;

    impl embedded_hal::spi::Error for MockSpiError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Mock SPI bus; fails the write at index `fail_at`
    struct MockSpi {
        log: Log,
        writes: usize,
        fail_at: Option<usize>,
    }

    impl ErrorType for MockSpi {
        type Error = MockSpiError;
    }

    impl SpiBus for MockSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            let index = self.writes;
            self.writes += 1;
            if self.fail_at == Some(index) {
                return Err(MockSpiError);
            }
            self.log.borrow_mut().push(BusEvent::Write(words.to_vec()));
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
            self.write(write)
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push(BusEvent::Flush);
            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum PinRole {
        Cs,
        Dc,
        Rst,
    }

    /// Mock GPIO pin logging its level changes
    struct MockPin {
        log: Log,
        role: PinRole,
    }

    impl MockPin {
        fn record(&mut self, high: bool) {
            let event = match self.role {
                PinRole::Cs => BusEvent::Cs(high),
                PinRole::Dc => BusEvent::Dc(high),
                PinRole::Rst => BusEvent::Rst(high),
            };
            self.log.borrow_mut().push(event);
        }
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.record(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.record(true);
            Ok(())
        }
    }

    struct MockDelay {
        log: Log,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(BusEvent::DelayMs(ms));
        }
    }

    fn pin(log: &Log, role: PinRole) -> MockPin {
        MockPin {
            log: log.clone(),
            role,
        }
    }

    fn driver(log: &Log, fail_at: Option<usize>) -> Sh1107Spi<MockSpi, MockPin, MockPin> {
        let spi = MockSpi {
            log: log.clone(),
            writes: 0,
            fail_at,
        };
        Sh1107Spi::new(spi, pin(log, PinRole::Cs), pin(log, PinRole::Dc))
    }

    fn events(log: &Log) -> Vec<BusEvent> {
        log.borrow().clone()
    }

    #[test]
    fn test_command_transfer_framing() {
        let log = Log::default();
        let mut panel = driver(&log, None);

        panel.write_command(0xB3).unwrap();

        assert_eq!(
            events(&log),
            vec![
                BusEvent::Dc(false),
                BusEvent::Cs(false),
                BusEvent::Write(vec![0xB3]),
                BusEvent::Flush,
                BusEvent::Cs(true),
            ]
        );
    }

    #[test]
    fn test_data_transfer_framing() {
        let log = Log::default();
        let mut panel = driver(&log, None);

        panel.write_data(&[0xAA; 64]).unwrap();

        assert_eq!(
            events(&log),
            vec![
                BusEvent::Dc(true),
                BusEvent::Cs(false),
                BusEvent::Write(vec![0xAA; 64]),
                BusEvent::Flush,
                BusEvent::Cs(true),
            ]
        );
    }

    #[test]
    fn test_failed_write_releases_cs() {
        let log = Log::default();
        let mut panel = driver(&log, Some(0));

        assert_eq!(
            panel.write_data(&[1, 2, 3]),
            Err(Sh1107Error::Spi(MockSpiError))
        );
        assert_eq!(
            events(&log),
            vec![BusEvent::Dc(true), BusEvent::Cs(false), BusEvent::Cs(true)]
        );
    }

    #[test]
    fn test_init_sends_sequence_as_single_commands() {
        let log = Log::default();
        let mut panel = driver(&log, None);

        panel.init().unwrap();

        let events = events(&log);
        // CS idles high before the first transfer
        assert_eq!(events[0], BusEvent::Cs(true));

        let writes: Vec<Vec<u8>> = events
            .iter()
            .filter_map(|e| match e {
                BusEvent::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect();
        let expected: Vec<Vec<u8>> = INIT_SEQUENCE.iter().map(|&b| vec![b]).collect();
        assert_eq!(writes, expected);

        assert!(events.iter().all(|e| *e != BusEvent::Dc(true)));
        assert_eq!(INIT_SEQUENCE[0], 0xAE);
        assert_eq!(INIT_SEQUENCE[21], 0xAF);
    }

    #[test]
    fn test_hard_reset_timing() {
        let log = Log::default();
        let mut rst = pin(&log, PinRole::Rst);
        let mut delay = MockDelay { log: log.clone() };

        hard_reset(&mut rst, &mut delay).unwrap();

        assert_eq!(
            events(&log),
            vec![
                BusEvent::Rst(true),
                BusEvent::DelayMs(10),
                BusEvent::Rst(false),
                BusEvent::DelayMs(20),
                BusEvent::Rst(true),
                BusEvent::DelayMs(20),
            ]
        );
    }

    #[test]
    fn test_frame_present_over_spi() {
        let log = Log::default();
        let mut fb = RotatingFramebuffer::new(driver(&log, None), Rotation::Clockwise);

        fb.present().unwrap();

        let events = events(&log);
        let writes: Vec<&Vec<u8>> = events
            .iter()
            .filter_map(|e| match e {
                BusEvent::Write(bytes) => Some(bytes),
                _ => None,
            })
            .collect();
        assert_eq!(writes.len(), 16 * 4);
        assert_eq!(writes[0], &vec![0xB0]);
        assert_eq!(writes[3].len(), 64);
        assert_eq!(writes[60], &vec![0xBF]);

        let selects = events.iter().filter(|e| **e == BusEvent::Cs(false)).count();
        let releases = events.iter().filter(|e| **e == BusEvent::Cs(true)).count();
        assert_eq!(selects, 64);
        assert_eq!(releases, 64);
        assert_eq!(events.last(), Some(&BusEvent::Cs(true)));
    }

    #[test]
    fn test_frame_present_stops_at_failed_page() {
        let log = Log::default();
        // Write 7 is page 1's data burst
        let mut fb = RotatingFramebuffer::new(driver(&log, Some(7)), Rotation::Clockwise);

        let err = fb.present().unwrap_err();
        assert_eq!(
            err,
            PresentError {
                page: 1,
                stage: PageStage::Data,
                source: Sh1107Error::Spi(MockSpiError),
            }
        );

        let events = events(&log);
        assert_eq!(events.last(), Some(&BusEvent::Cs(true)));
        let writes = events
            .iter()
            .filter(|e| matches!(e, BusEvent::Write(_)))
            .count();
        assert_eq!(writes, 7);
    }
}
