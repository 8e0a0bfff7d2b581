//! HAL seams the core consumes beyond `embedded-hal`.
//!
//! SPI, GPIO and delays come in through the `embedded-hal` 1.x traits. The
//! two things that don't are the byte-oriented serial transport the host
//! talks over and a monotonic clock for parser timeouts; both are narrow
//! traits so the whole core runs against fakes on the host.

/// Non-blocking byte-oriented serial transport (USB CDC or a UART).
///
/// The application loop is the only reader and the only writer: it pulls
/// frame bytes through [`read_byte`](SerialPort::read_byte) and pushes the
/// `OK` acknowledgement through [`write_all`](SerialPort::write_all).
pub trait SerialPort {
    /// Transport error. Surfaced only to the log; the wire protocol itself
    /// carries no error channel.
    type Error: core::fmt::Debug;

    /// Return the next received byte, or `None` if nothing is pending.
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue `bytes` for transmission.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Push any queued transmit bytes out to the host.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Monotonic clock used for the parser's per-phase byte timeouts.
pub trait Monotonic {
    /// Microseconds since an arbitrary epoch. Must never go backwards.
    fn now_us(&mut self) -> u64;
}
