//! Refresh state machine for the dual-controller panel.
//!
//! All four refresh entry points funnel into the same primitives: program a
//! RAM window on one half, stream NEW and OLD RAM column-major with Y
//! decrementing, then fire Display Update Control 2 + Master Activation and
//! wait for BUSY. The halves differ only in their `controller::Half`
//! descriptor, so the master/slave asymmetry (including the slave's
//! reversed X addressing) never leaks into the sequencing code.
//!
//! ## Update modes
//!
//! - **Full** (0xF7): slow full-waveform refresh with visible flashing.
//!   Erases ghosting. OLD RAM is cleared to zero for this mode; the full
//!   waveform does not depend on it.
//! - **Partial** (0xFF): fast refresh that transitions each pixel from OLD
//!   to NEW without flashing. Correctness depends on OLD RAM holding what
//!   the panel currently shows, which is why every partial write streams
//!   the caller's previous full frame alongside the new rectangle.

use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use super::cmd::Cmd;
use super::controller::{Half, MASTER, SLAVE};
use super::flag::Flag;
use super::interface::DisplayInterface;
use super::{BYTES_PER_ROW, FRAME_BYTES, HEIGHT, WIDTH};

/// BUSY bound for reset and addressing setup.
const SETUP_TIMEOUT_MS: u32 = 5_000;

/// BUSY bound for a triggered refresh; full refreshes on this glass take
/// several seconds.
const UPDATE_TIMEOUT_MS: u32 = 20_000;

/// Set true if each byte appears bit-mirrored on the glass.
pub const BIT_REVERSE: bool = false;

/// Set true if black and white come out swapped on the glass.
pub const INVERT_BYTES: bool = false;

/// Panel-tuning transform applied to every byte written to NEW or OLD RAM.
fn xform(b: u8) -> u8 {
    let b = if BIT_REVERSE { b.reverse_bits() } else { b };
    if INVERT_BYTES {
        !b
    } else {
        b
    }
}

/// Driver for the SSD1683 master/slave pair behind a GDEY0579T93 panel.
///
/// Generic over the `embedded-hal` SPI device, BUSY input, DC and RST
/// outputs and a delay provider; CS is owned by the `SpiDevice`. Configure
/// the bus for 8-bit words, mode 0 (CPOL=0, CPHA=0), MSB first, at up to
/// 20 MHz.
///
/// All operations except [`init`](Ssd1683::init) are defensive no-ops until
/// initialization has completed.
pub struct Ssd1683<SPI, BSY, DC, RST, DELAY> {
    interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>,
    initialized: bool,
}

impl<SPI, BSY, DC, RST, DELAY> Ssd1683<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Wrap the bus and pins. The panel is not touched until
    /// [`init`](Ssd1683::init).
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY, busy_active_high: bool) -> Self {
        Ssd1683 {
            interface: DisplayInterface::new(spi, busy, dc, rst, delay, busy_active_high),
            initialized: false,
        }
    }

    /// Reset and configure the controller pair.
    ///
    /// Hardware reset pulse, software reset, then the two registers this
    /// glass needs off their defaults: border waveform and the internal
    /// temperature sensor.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        log::info!("initializing SSD1683 controller pair");

        self.interface.reset()?;

        self.interface.cmd(Cmd::SW_RESET)?;
        self.interface.wait_idle(SETUP_TIMEOUT_MS);

        self.interface
            .cmd_with_data(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_DEFAULT])?;
        self.interface
            .cmd_with_data(Cmd::TEMP_CONTROL, &[Flag::INTERNAL_TEMP_SENSOR])?;

        self.initialized = true;
        Ok(())
    }

    /// Whether [`init`](Ssd1683::init) has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Block until BUSY deasserts or `timeout_ms` elapses.
    pub fn wait_idle(&mut self, timeout_ms: u32) -> bool {
        self.interface.wait_idle(timeout_ms)
    }

    /// Full refresh from a complete framebuffer.
    pub fn show_full(&mut self, frame: &[u8; FRAME_BYTES]) -> Result<(), DisplayError> {
        if !self.initialized {
            return Ok(());
        }
        log::debug!("full refresh");
        self.write_full_frame(Some(frame))?;
        self.trigger_update(Flag::UPDATE_MODE_FULL)
    }

    /// Full refresh to solid white.
    ///
    /// Streams the repeated white byte instead of materializing a 26 KiB
    /// scratch framebuffer; the bus traffic is identical to
    /// [`show_full`](Ssd1683::show_full) of an all-white frame.
    pub fn clear_to_white(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Ok(());
        }
        log::debug!("clear to white");
        self.write_full_frame(None)?;
        self.trigger_update(Flag::UPDATE_MODE_FULL)
    }

    /// Full-screen partial refresh: the whole frame with the partial
    /// waveform, transitioning from `old_frame` (what the panel shows now)
    /// to `new_frame`.
    pub fn show_partial_full(
        &mut self,
        new_frame: &[u8; FRAME_BYTES],
        old_frame: &[u8; FRAME_BYTES],
    ) -> Result<(), DisplayError> {
        self.show_partial_window(0, 0, WIDTH, HEIGHT, new_frame, old_frame)
    }

    /// Partial refresh of one rectangle.
    ///
    /// `x` and `w` must be byte aligned and the origin on-panel; `w`/`h`
    /// are clamped to the panel edges. `rect_new` holds the rectangle's
    /// rows with a stride of `w / 8` bytes; `old_full` is the complete
    /// previously-displayed frame. Invalid geometry is dropped without
    /// touching the panel.
    pub fn show_partial_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        rect_new: &[u8],
        old_full: &[u8; FRAME_BYTES],
    ) -> Result<(), DisplayError> {
        if !self.initialized {
            return Ok(());
        }
        if x % 8 != 0 || w % 8 != 0 || w == 0 || h == 0 || x >= WIDTH || y >= HEIGHT {
            log::warn!("rejecting partial window x={} y={} w={} h={}", x, y, w, h);
            return Ok(());
        }
        let w = w.min(WIDTH - x);
        let h = h.min(HEIGHT - y);

        let rect_xb = x / 8;
        let rect_wb = w / 8;
        if rect_new.len() < usize::from(rect_wb) * usize::from(h) {
            log::warn!("rejecting partial window: rect buffer too short");
            return Ok(());
        }

        let x_endb = rect_xb + rect_wb - 1;
        // Y decrement: the controller walks each column bottom-up
        let y_top = y;
        let y_bottom = y + h - 1;

        log::debug!("partial refresh x={} y={} w={} h={}", x, y, w, h);

        for half in [&MASTER, &SLAVE] {
            // byte column 49 is shared, so both intersections may contain it
            let start = rect_xb.max(half.col_start);
            let end = x_endb.min(half.col_end);
            if start > end {
                continue;
            }

            self.program_window(half, start, end, y_top, y_bottom)?;
            self.interface.wait_idle(SETUP_TIMEOUT_MS);

            let mut col = [0u8; HEIGHT as usize];
            let rows = usize::from(h);

            self.interface.cmd(half.write_new)?;
            for gcol in start..=end {
                for (i, yy) in (y_top..=y_bottom).rev().enumerate() {
                    let src =
                        usize::from(yy - y) * usize::from(rect_wb) + usize::from(gcol - rect_xb);
                    col[i] = xform(rect_new[src]);
                }
                self.interface.data(&col[..rows])?;
            }

            self.interface.cmd(half.write_old)?;
            for gcol in start..=end {
                for (i, yy) in (y_top..=y_bottom).rev().enumerate() {
                    col[i] = xform(old_full[usize::from(yy) * BYTES_PER_ROW + usize::from(gcol)]);
                }
                self.interface.data(&col[..rows])?;
            }
        }

        self.trigger_update(Flag::UPDATE_MODE_PARTIAL)
    }

    /// Enter deep sleep mode 1. Only a reset wakes the controllers, so the
    /// driver drops back to uninitialized; call [`wake_up`](Ssd1683::wake_up)
    /// before the next refresh.
    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Ok(());
        }
        log::info!("entering deep sleep");
        self.interface
            .cmd_with_data(Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_MODE_1])?;
        self.initialized = false;
        Ok(())
    }

    /// Wake from deep sleep by re-running the reset and init sequence.
    pub fn wake_up(&mut self) -> Result<(), DisplayError> {
        self.init()
    }

    /// Program one half's data entry mode, X/Y window and cursors for the
    /// global byte-column range `col_start..=col_end` and pixel rows
    /// `y_top..=y_bottom`. Y start is the bottom row because the entry mode
    /// decrements Y.
    fn program_window(
        &mut self,
        half: &Half,
        col_start: u16,
        col_end: u16,
        y_top: u16,
        y_bottom: u16,
    ) -> Result<(), DisplayError> {
        let yb = y_bottom.to_le_bytes();
        let yt = y_top.to_le_bytes();

        self.interface
            .cmd_with_data(half.entry_cmd, &[half.entry_mode])?;
        self.interface.cmd_with_data(
            half.x_window,
            &[half.local_x(col_start), half.local_x(col_end)],
        )?;
        self.interface
            .cmd_with_data(half.y_window, &[yb[0], yb[1], yt[0], yt[1]])?;
        self.interface
            .cmd_with_data(half.x_counter, &[half.local_x(col_start)])?;
        self.interface.cmd_with_data(half.y_counter, &[yb[0], yb[1]])?;
        Ok(())
    }

    /// Load both halves' full RAM. `Some(frame)` streams the framebuffer,
    /// `None` streams solid white. OLD RAM is cleared to zero either way;
    /// only the partial path cares about OLD contents.
    fn write_full_frame(&mut self, frame: Option<&[u8; FRAME_BYTES]>) -> Result<(), DisplayError> {
        for half in [&MASTER, &SLAVE] {
            self.program_window(half, half.col_start, half.col_end, 0, HEIGHT - 1)?;
            self.interface.wait_idle(SETUP_TIMEOUT_MS);

            let mut col = [0u8; HEIGHT as usize];

            self.interface.cmd(half.write_new)?;
            for gcol in half.col_start..=half.col_end {
                match frame {
                    Some(frame) => {
                        for (i, yy) in (0..HEIGHT).rev().enumerate() {
                            col[i] =
                                xform(frame[usize::from(yy) * BYTES_PER_ROW + usize::from(gcol)]);
                        }
                    }
                    None => col.fill(xform(0xFF)),
                }
                self.interface.data(&col)?;
            }

            self.interface.cmd(half.write_old)?;
            let old = [xform(0x00); HEIGHT as usize];
            for _ in half.col_start..=half.col_end {
                self.interface.data(&old)?;
            }
        }
        Ok(())
    }

    /// Fire Display Update Control 2 with `mode` and Master Activation,
    /// then wait out the refresh.
    fn trigger_update(&mut self, mode: u8) -> Result<(), DisplayError> {
        self.interface
            .cmd_with_data(Cmd::UPDATE_DISPLAY_CTRL2, &[mode])?;
        self.interface.cmd(Cmd::MASTER_ACTIVATE)?;
        self.interface.wait_idle(UPDATE_TIMEOUT_MS);
        Ok(())
    }
}
