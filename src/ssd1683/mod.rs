//! SSD1683 driver for the GDEY0579T93 5.79" e-paper panel.
//!
//! The glass is 792×272, monochrome, and driven by *two* SSD1683 controller
//! halves sharing one SPI bus and one BUSY line. The master half owns the
//! left 400 pixels, the slave half the right 400, and the byte column at
//! index 49 is shared between them. The slave's X addressing runs in the
//! opposite direction, and both halves fill their RAM column-major with Y
//! decrementing, so every write goes through the same byte-order transform
//! from the host's row-major top-down framebuffer.
//!
//! ## Module map
//!
//! - [`cmd`] / [`flag`]: raw opcodes and their parameter values, master and
//!   slave banks side by side.
//! - [`controller`]: the per-half descriptor that folds the two command
//!   banks and the slave's reversed X mapping into one code path.
//! - [`interface`]: SPI command/data framing, hardware reset and the BUSY
//!   handshake.
//! - [`driver`]: the refresh state machine with `init`, `clear_to_white`,
//!   `show_full`, `show_partial_full`, `show_partial_window`, `sleep`.
//!
//! ## Framebuffer format
//!
//! 1 bit per pixel, row-major, top row first, 99 bytes per row, MSB is the
//! leftmost pixel of its byte. Bit value 1 is white, 0 is black.

pub mod cmd;
pub mod controller;
pub mod driver;
pub mod flag;
pub mod interface;

/// Display width, pixels horizontally.
pub const WIDTH: u16 = 792;

/// Display height, pixels vertically.
pub const HEIGHT: u16 = 272;

/// Packed bytes per framebuffer row.
pub const BYTES_PER_ROW: usize = (WIDTH as usize + 7) / 8;

/// Total framebuffer size in bytes.
pub const FRAME_BYTES: usize = BYTES_PER_ROW * HEIGHT as usize;

/// Byte columns driven by the master controller half.
pub const MASTER_COLS: u16 = 50;

/// Byte columns driven by the slave controller half.
pub const SLAVE_COLS: u16 = 50;

/// Global byte column where the slave half begins; shared with the master.
pub const SLAVE_START: u16 = 49;
