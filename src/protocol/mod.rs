//! The `MWF1` wire format.
//!
//! Host → device frames are little-endian throughout:
//!
//! ```text
//! offset  size  field
//! 0       4     magic   'M' 'W' 'F' '1'
//! 4       4     len     payload length, u32 LE
//! 8       len   payload
//! 8+len   4     crc32   CRC-32/IEEE of payload[0..len]
//! ```
//!
//! The payload starts with a flags byte (bit 0 `FORCE_FULL`, bit 1 `RECT`)
//! followed either by a complete 26 928-byte framebuffer or by an 8-byte
//! rectangle header plus the rectangle's pixel rows. Device → host traffic
//! is exactly two bytes, `O` `K`, sent after an update has completed; a
//! rejected frame produces silence and the host retransmits on timeout.

pub mod crc32;
pub mod parser;

use crate::ssd1683::{FRAME_BYTES, HEIGHT, WIDTH};

/// Frame magic, ASCII `MWF1`.
pub const MAGIC: [u8; 4] = *b"MWF1";

/// Largest legal payload: flags byte + rect header + full framebuffer.
pub const MAX_PAYLOAD: usize = FRAME_BYTES + 9;

/// Acknowledgement bytes sent after a completed update.
pub const ACK_OK: [u8; 2] = *b"OK";

/// Bits of the payload flags byte.
pub struct FrameFlag;

#[allow(missing_docs)]
impl FrameFlag {
    pub const FORCE_FULL: u8 = 0x01;
    pub const RECT: u8 = 0x02;
}

/// A validated, decoded payload.
///
/// Borrowing from the parser's payload buffer keeps the 26 KiB framebuffer
/// from being copied just to be looked at.
pub enum Update<'a> {
    /// Full-frame update: a complete framebuffer replaces the display.
    Full {
        /// Clear-then-full-refresh instead of a partial update.
        force_full: bool,
        /// Row-major 1bpp framebuffer, top row first, MSB = leftmost pixel.
        frame: &'a [u8; FRAME_BYTES],
    },
    /// Windowed update: pixel rows for one on-panel rectangle.
    Rect {
        /// Patch the stored frame, then clear-and-full-refresh it.
        force_full: bool,
        /// Left edge in pixels, byte aligned.
        x: u16,
        /// Top edge in pixels.
        y: u16,
        /// Width in pixels, byte aligned, clamped on-panel.
        w: u16,
        /// Height in pixels, clamped on-panel.
        h: u16,
        /// `(w / 8) * h` rectangle bytes, row-major.
        bytes: &'a [u8],
    },
}

impl<'a> Update<'a> {
    /// Decode and validate a parser payload.
    ///
    /// Returns `None` for any shape the protocol does not allow: a missing
    /// flags byte, a full frame of the wrong size, a misaligned or
    /// off-panel rectangle, or a rectangle whose byte count disagrees with
    /// its (clamped) header.
    pub fn decode(payload: &'a [u8]) -> Option<Update<'a>> {
        let (&flags, rest) = payload.split_first()?;
        let force_full = flags & FrameFlag::FORCE_FULL != 0;

        if flags & FrameFlag::RECT == 0 {
            let frame: &[u8; FRAME_BYTES] = rest.try_into().ok()?;
            return Some(Update::Full { force_full, frame });
        }

        if rest.len() < 8 {
            return None;
        }
        let x = u16::from_le_bytes([rest[0], rest[1]]);
        let y = u16::from_le_bytes([rest[2], rest[3]]);
        let w = u16::from_le_bytes([rest[4], rest[5]]);
        let h = u16::from_le_bytes([rest[6], rest[7]]);

        if x % 8 != 0 || w % 8 != 0 || w == 0 || h == 0 || x >= WIDTH || y >= HEIGHT {
            log::debug!("rect rejected: x={} y={} w={} h={}", x, y, w, h);
            return None;
        }
        let w = w.min(WIDTH - x);
        let h = h.min(HEIGHT - y);

        let bytes = &rest[8..];
        if bytes.len() != usize::from(w / 8) * usize::from(h) {
            log::debug!("rect rejected: {} bytes for {}x{}", bytes.len(), w, h);
            return None;
        }

        Some(Update::Rect {
            force_full,
            x,
            y,
            w,
            h,
            bytes,
        })
    }
}
