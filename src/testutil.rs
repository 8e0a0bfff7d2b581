//! Shared fixtures for the unit tests: an expected-bus-trace builder over
//! `embedded-hal-mock`, scripted fakes for the serial and clock seams, and
//! wire-frame helpers.

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

use crate::hal::{Monotonic, SerialPort};
use crate::protocol::crc32::crc32;
use crate::ssd1683::{BYTES_PER_ROW, FRAME_BYTES, HEIGHT};

/// The mock bus and pins a driver under test runs against, plus `done()`
/// verification in one place. The mocks share state with the clones moved
/// into the driver, so holding this after constructing the driver is enough
/// to verify the whole trace.
pub struct Mocks {
    pub spi: SpiMock<u8>,
    pub busy: PinMock,
    pub dc: PinMock,
    pub rst: PinMock,
}

impl Mocks {
    /// Assert every expected transaction was consumed.
    pub fn verify(&mut self) {
        self.spi.done();
        self.busy.done();
        self.dc.done();
        self.rst.done();
    }
}

/// Builder for the exact (CS, DC, byte) operation sequence a driver call is
/// expected to emit, mirroring how `DisplayInterface` frames the bus: one
/// SPI transaction per command byte and one per data burst.
#[derive(Default)]
pub struct Trace {
    spi: Vec<SpiTransaction<u8>>,
    dc: Vec<PinTransaction>,
    busy: Vec<PinTransaction>,
    rst: Vec<PinTransaction>,
}

impl Trace {
    pub fn new() -> Self {
        Trace::default()
    }

    /// Instantiate the mocks: one set to move into the driver, one set of
    /// shared-state handles for verification.
    pub fn mocks(&self) -> (Mocks, Mocks) {
        let mocks = Mocks {
            spi: SpiMock::new(&self.spi),
            busy: PinMock::new(&self.busy),
            dc: PinMock::new(&self.dc),
            rst: PinMock::new(&self.rst),
        };
        let handles = Mocks {
            spi: mocks.spi.clone(),
            busy: mocks.busy.clone(),
            dc: mocks.dc.clone(),
            rst: mocks.rst.clone(),
        };
        (mocks, handles)
    }

    /// One command byte: DC low, single-byte SPI transaction.
    pub fn cmd(&mut self, c: u8) {
        self.dc.push(PinTransaction::set(PinState::Low));
        self.spi.push(SpiTransaction::transaction_start());
        self.spi.push(SpiTransaction::write_vec(vec![c]));
        self.spi.push(SpiTransaction::transaction_end());
    }

    /// One data burst: DC high, one SPI transaction for the whole slice.
    pub fn data(&mut self, d: &[u8]) {
        self.dc.push(PinTransaction::set(PinState::High));
        self.spi.push(SpiTransaction::transaction_start());
        self.spi.push(SpiTransaction::write_vec(d.to_vec()));
        self.spi.push(SpiTransaction::transaction_end());
    }

    pub fn cmd_data(&mut self, c: u8, d: &[u8]) {
        self.cmd(c);
        self.data(d);
    }

    /// One BUSY poll answered "idle" (active-high line, so idle reads low).
    pub fn idle(&mut self) {
        self.busy.push(PinTransaction::get(PinState::Low));
    }

    /// Hardware reset pulse.
    pub fn reset(&mut self) {
        self.rst.push(PinTransaction::set(PinState::Low));
        self.rst.push(PinTransaction::set(PinState::High));
    }

    /// The `init` sequence: reset, SWRESET, border waveform, temp sensor.
    pub fn init(&mut self) {
        self.reset();
        self.cmd(0x12);
        self.idle();
        self.cmd_data(0x3C, &[0x80]);
        self.cmd_data(0x18, &[0x80]);
    }

    /// Master window programming for global byte columns and pixel rows.
    pub fn window_master(&mut self, x_start: u8, x_end: u8, y_top: u16, y_bottom: u16) {
        let yb = y_bottom.to_le_bytes();
        let yt = y_top.to_le_bytes();
        self.cmd_data(0x11, &[0x05]);
        self.cmd_data(0x44, &[x_start, x_end]);
        self.cmd_data(0x45, &[yb[0], yb[1], yt[0], yt[1]]);
        self.cmd_data(0x4E, &[x_start]);
        self.cmd_data(0x4F, &[yb[0], yb[1]]);
    }

    /// Slave window programming; X addresses are slave-local (reversed).
    pub fn window_slave(&mut self, x_start: u8, x_end: u8, y_top: u16, y_bottom: u16) {
        let yb = y_bottom.to_le_bytes();
        let yt = y_top.to_le_bytes();
        self.cmd_data(0x91, &[0x04]);
        self.cmd_data(0xC4, &[x_start, x_end]);
        self.cmd_data(0xC5, &[yb[0], yb[1], yt[0], yt[1]]);
        self.cmd_data(0xCE, &[x_start]);
        self.cmd_data(0xCF, &[yb[0], yb[1]]);
    }

    /// Full update trigger: 0x22=0xF7, 0x20, BUSY wait.
    pub fn full_update(&mut self) {
        self.cmd_data(0x22, &[0xF7]);
        self.cmd(0x20);
        self.idle();
    }

    /// Partial update trigger: 0x22=0xFF, 0x20, BUSY wait.
    pub fn partial_update(&mut self) {
        self.cmd_data(0x22, &[0xFF]);
        self.cmd(0x20);
        self.idle();
    }

    /// The complete `show_full` sequence for `frame`.
    pub fn show_full(&mut self, frame: &[u8; FRAME_BYTES]) {
        self.window_master(0x00, 0x31, 0, 271);
        self.idle();
        self.cmd(0x24);
        for col in 0..50 {
            self.data(&column(frame, col));
        }
        self.cmd(0x26);
        for _ in 0..50 {
            self.data(&[0u8; HEIGHT as usize]);
        }
        self.window_slave(0x31, 0x00, 0, 271);
        self.idle();
        self.cmd(0xA4);
        for col in 49..99 {
            self.data(&column(frame, col));
        }
        self.cmd(0xA6);
        for _ in 0..50 {
            self.data(&[0u8; HEIGHT as usize]);
        }
        self.full_update();
    }

    /// `clear_to_white` is `show_full` of an all-white frame.
    pub fn clear_to_white(&mut self) {
        self.show_full(&[0xFF; FRAME_BYTES]);
    }

    /// The complete `show_partial_full` sequence: both halves, NEW from
    /// `new`, OLD from `old`, partial trigger.
    pub fn partial_full(&mut self, new: &[u8; FRAME_BYTES], old: &[u8; FRAME_BYTES]) {
        self.window_master(0x00, 0x31, 0, 271);
        self.idle();
        self.cmd(0x24);
        for col in 0..50 {
            self.data(&column(new, col));
        }
        self.cmd(0x26);
        for col in 0..50 {
            self.data(&column(old, col));
        }
        self.window_slave(0x31, 0x00, 0, 271);
        self.idle();
        self.cmd(0xA4);
        for col in 49..99 {
            self.data(&column(new, col));
        }
        self.cmd(0xA6);
        for col in 49..99 {
            self.data(&column(old, col));
        }
        self.partial_update();
    }
}

/// One byte column of a framebuffer in transmission order: rows bottom-up.
pub fn column(frame: &[u8; FRAME_BYTES], col: usize) -> Vec<u8> {
    (0..HEIGHT as usize)
        .rev()
        .map(|row| frame[row * BYTES_PER_ROW + col])
        .collect()
}

/// A framebuffer where every byte encodes its own position, for catching
/// traversal-order mistakes.
pub fn patterned_frame() -> [u8; FRAME_BYTES] {
    let mut frame = [0u8; FRAME_BYTES];
    for (i, b) in frame.iter_mut().enumerate() {
        *b = (i % 251) as u8;
    }
    frame
}

/// Wrap `payload` in a complete wire frame: magic, LE length, payload, CRC.
pub fn frame_bytes(payload: &[u8]) -> Vec<u8> {
    let mut f = b"MWF1".to_vec();
    f.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    f.extend_from_slice(payload);
    f.extend_from_slice(&crc32(payload).to_le_bytes());
    f
}

/// Serial fake: scripted input, recorded output.
pub struct ScriptedSerial {
    pub input: VecDeque<u8>,
    pub output: Vec<u8>,
    pub flushes: usize,
}

impl ScriptedSerial {
    pub fn with_input(bytes: &[u8]) -> Self {
        ScriptedSerial {
            input: bytes.iter().copied().collect(),
            output: Vec::new(),
            flushes: 0,
        }
    }
}

impl SerialPort for ScriptedSerial {
    type Error = core::convert::Infallible;

    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

/// Clock fake with a manually advanced timestamp.
pub struct TestClock(pub u64);

impl Monotonic for TestClock {
    fn now_us(&mut self) -> u64 {
        self.0
    }
}
