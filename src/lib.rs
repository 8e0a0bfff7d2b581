//! Firmware core for a USB-attached e-paper display driver.
//!
//! The target hardware is a 792×272 monochrome GDEY0579T93 panel driven by a
//! pair of cooperating SSD1683 controller halves on a shared SPI bus. A host
//! streams framed 1bpp bitmap updates over a byte-oriented serial transport
//! (typically USB CDC); this crate validates the frames and turns them into
//! full or partial panel refreshes.
//!
//! ## Architecture
//!
//! - [`protocol`]: CRC-32 primitive, the resynchronizable frame parser and
//!   payload decoding for the `MWF1` wire format.
//! - [`ssd1683`]: the panel driver, covering SPI command/data sequencing,
//!   the master/slave RAM addressing asymmetry, full and partial refresh.
//! - [`app`]: the application loop binding parser to driver, tracking the
//!   last-displayed frame and emitting `OK` acknowledgements.
//! - [`hal`]: the two HAL seams `embedded-hal` does not model, a
//!   non-blocking serial port and a monotonic clock.
//!
//! The crate is `no_std` and allocation-free. Board bring-up (clocks, USB
//! enumeration, pin muxing) is the integrator's job: construct the concrete
//! `embedded-hal` SPI device and pins, a [`hal::SerialPort`] and a
//! [`hal::Monotonic`], then hand them to [`App`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inkstream::{App, Ssd1683};
//!
//! let driver = Ssd1683::new(spi, busy, dc, rst, delay, true);
//! let mut app = App::new(driver, serial, clock);
//! app.init()?;
//! app.run();
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod app;
pub mod hal;
pub mod protocol;
pub mod ssd1683;

#[cfg(test)]
pub(crate) mod testutil;

pub use app::App;
pub use ssd1683::driver::Ssd1683;
