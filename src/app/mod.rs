//! Application loop: serial bytes in, panel refreshes out, `OK` back.
//!
//! The loop owns the one copy of the last-displayed framebuffer
//! (`prev_frame`). Partial refreshes need it as the controllers' OLD image,
//! and every accepted update ends by reconciling it, so it always reflects
//! what the glass shows: all-white right after bring-up, patched in place
//! after a rectangle, replaced after a full frame.
//!
//! Everything here runs to completion on one thread: a frame is parsed,
//! dispatched, displayed and acknowledged before the next byte is looked
//! at. The `OK` therefore always happens-after the refresh it reports.

use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::hal::{Monotonic, SerialPort};
use crate::protocol::{parser::FrameParser, Update, ACK_OK};
use crate::ssd1683::driver::Ssd1683;
use crate::ssd1683::{BYTES_PER_ROW, FRAME_BYTES};

/// What a serviced frame did to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Full-screen partial refresh.
    PartialFull,
    /// Clear to white, then full refresh of the received frame.
    ClearedFull,
    /// Windowed partial refresh of one rectangle.
    WindowPartial,
    /// Rectangle patched into the stored frame, then clear + full refresh.
    PatchedClearedFull,
}

/// The firmware core: parser, driver and frame state under one roof.
///
/// Construct it with a driver, serial port and clock, call
/// [`init`](App::init) once, then either [`run`](App::run) forever or call
/// [`service`](App::service) from your own main loop.
///
/// The struct embeds both the parser's receive buffer and `prev_frame`
/// (~54 KiB together); place it accordingly (a static cell or a one-time
/// heap allocation, not the stack).
pub struct App<SPI, BSY, DC, RST, DELAY, SER, CLK> {
    driver: Ssd1683<SPI, BSY, DC, RST, DELAY>,
    serial: SER,
    clock: CLK,
    parser: FrameParser,
    prev_frame: [u8; FRAME_BYTES],
}

impl<SPI, BSY, DC, RST, DELAY, SER, CLK> App<SPI, BSY, DC, RST, DELAY, SER, CLK>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    SER: SerialPort,
    CLK: Monotonic,
{
    /// Bind a panel driver to the host transport.
    pub fn new(driver: Ssd1683<SPI, BSY, DC, RST, DELAY>, serial: SER, clock: CLK) -> Self {
        App {
            driver,
            serial,
            clock,
            parser: FrameParser::new(),
            prev_frame: [0xFF; FRAME_BYTES],
        }
    }

    /// Bring the panel up: init, clear to white, and record the all-white
    /// frame as what the panel shows.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.driver.init()?;
        self.driver.clear_to_white()?;
        self.prev_frame.fill(0xFF);
        log::info!("panel ready");
        Ok(())
    }

    /// Run the loop forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.service();
        }
    }

    /// Pump the transport once.
    ///
    /// Drains every pending serial byte through the parser. Returns after
    /// applying one validated frame (with its `OK` already on the wire), or
    /// with `None` once the transport runs dry. Rejected frames are
    /// swallowed here; the host learns about them by not hearing `OK`.
    pub fn service(&mut self) -> Option<Applied> {
        loop {
            let now = self.clock.now_us();
            let Some(byte) = self.serial.read_byte() else {
                self.parser.poll_timeout(now);
                return None;
            };
            if let Some(len) = self.parser.feed(byte, now) {
                debug_assert_eq!(len, self.parser.payload().len());
                if let Some(applied) = dispatch(
                    &mut self.driver,
                    &mut self.prev_frame,
                    &mut self.serial,
                    self.parser.payload(),
                ) {
                    return Some(applied);
                }
            }
        }
    }

    /// The frame the panel currently displays.
    pub fn prev_frame(&self) -> &[u8; FRAME_BYTES] {
        &self.prev_frame
    }
}

/// Decode one validated payload, drive the panel, acknowledge.
fn dispatch<SPI, BSY, DC, RST, DELAY, SER>(
    driver: &mut Ssd1683<SPI, BSY, DC, RST, DELAY>,
    prev_frame: &mut [u8; FRAME_BYTES],
    serial: &mut SER,
    payload: &[u8],
) -> Option<Applied>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    SER: SerialPort,
{
    let update = Update::decode(payload)?;

    match apply(driver, prev_frame, update) {
        Ok(applied) => {
            // the refresh (including its BUSY wait) has completed; only now
            // may the host see OK
            if let Err(e) = serial.write_all(&ACK_OK).and_then(|()| serial.flush()) {
                log::warn!("failed to send ACK: {:?}", e);
            }
            Some(applied)
        }
        Err(e) => {
            log::error!("display update failed: {:?}", e);
            None
        }
    }
}

fn apply<SPI, BSY, DC, RST, DELAY>(
    driver: &mut Ssd1683<SPI, BSY, DC, RST, DELAY>,
    prev_frame: &mut [u8; FRAME_BYTES],
    update: Update<'_>,
) -> Result<Applied, DisplayError>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    match update {
        Update::Full { force_full, frame } => {
            let applied = if force_full {
                driver.clear_to_white()?;
                driver.show_full(frame)?;
                Applied::ClearedFull
            } else {
                driver.show_partial_full(frame, prev_frame)?;
                Applied::PartialFull
            };
            prev_frame.copy_from_slice(frame);
            Ok(applied)
        }
        Update::Rect {
            force_full,
            x,
            y,
            w,
            h,
            bytes,
        } => {
            if force_full {
                patch_rect(prev_frame, x, y, w, h, bytes);
                driver.clear_to_white()?;
                driver.show_full(prev_frame)?;
                Ok(Applied::PatchedClearedFull)
            } else {
                // the un-patched prev_frame is the OLD image the partial
                // waveform transitions from
                driver.show_partial_window(x, y, w, h, bytes, prev_frame)?;
                patch_rect(prev_frame, x, y, w, h, bytes);
                Ok(Applied::WindowPartial)
            }
        }
    }
}

/// Overwrite the rectangle `(x, y, w, h)` of `frame` with `bytes`
/// (row-major, stride `w / 8`).
fn patch_rect(frame: &mut [u8; FRAME_BYTES], x: u16, y: u16, w: u16, h: u16, bytes: &[u8]) {
    let xb = usize::from(x / 8);
    let wb = usize::from(w / 8);
    for row in 0..usize::from(h) {
        let dst = (usize::from(y) + row) * BYTES_PER_ROW + xb;
        frame[dst..dst + wb].copy_from_slice(&bytes[row * wb..(row + 1) * wb]);
    }
}
