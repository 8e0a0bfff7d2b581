//! SPI plumbing shared by both controller halves.
//!
//! Every command byte goes out with DC low, every data burst with DC high;
//! CS framing is the `SpiDevice`'s job, so a multi-byte data burst rides a
//! single CS assertion, which the controller accepts. The BUSY line and the
//! reset pin also live here because both halves share them.

use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// Hardware reset pulse width, both phases.
const RESET_PULSE_MS: u32 = 10;

/// BUSY polling interval.
const BUSY_POLL_MS: u32 = 5;

/// Low-level connection to the controller pair.
pub struct DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    spi: SPI,
    busy: BSY,
    dc: DC,
    rst: RST,
    delay: DELAY,
    busy_active_high: bool,
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Wrap the bus, pins and delay provider.
    ///
    /// `busy_active_high` selects the BUSY polarity; this glass asserts
    /// BUSY high while an update runs.
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY, busy_active_high: bool) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
            busy_active_high,
        }
    }

    /// Send one command byte (DC low).
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(&[command])
            .map_err(|_| DisplayError::BusWriteError)
    }

    /// Send data bytes (DC high) as one bus transaction.
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(data)
            .map_err(|_| DisplayError::BusWriteError)
    }

    /// Send a command followed by its parameter bytes.
    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Hardware reset: RST low 10 ms, high 10 ms.
    pub(crate) fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        Ok(())
    }

    /// Poll BUSY until the controllers report idle.
    ///
    /// Returns `false` if BUSY is still asserted after `timeout_ms`. Per
    /// vendor behavior a timeout is reported, not fatal: callers log it and
    /// press on rather than wedging the frame.
    pub(crate) fn wait_idle(&mut self, timeout_ms: u32) -> bool {
        let polls = timeout_ms / BUSY_POLL_MS;
        for _ in 0..=polls {
            if !self.is_busy() {
                return true;
            }
            self.delay.delay_ms(BUSY_POLL_MS);
        }
        log::warn!("BUSY still asserted after {} ms", timeout_ms);
        false
    }

    fn is_busy(&mut self) -> bool {
        match self.busy.is_high() {
            Ok(level) => level == self.busy_active_high,
            Err(_) => {
                // unreadable pin: treat as idle so the sequence completes
                log::error!("failed to read BUSY pin");
                false
            }
        }
    }
}
