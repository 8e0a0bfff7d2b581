//! Resynchronizable frame parser for the `MWF1` wire format.
//!
//! The transport is a raw byte pipe with no framing of its own, so the
//! parser must survive truncated frames, flipped bits and arbitrary garbage
//! between frames. It does this with a 4-byte sliding sync window: every
//! byte seen while hunting for a frame is shifted into the window and the
//! window is compared against the magic, which finds a frame start at any
//! alignment. The window is never cleared, so a failed or rejected frame
//! costs nothing but the bytes already consumed.
//!
//! Validation failures are silent by design. The host treats a missing `OK`
//! as a timeout and retransmits, so there is no negative acknowledgement to
//! send and nothing for a corrupted link to wedge.

use super::{crc32::Crc32, MAGIC, MAX_PAYLOAD};

/// Inter-byte timeout while reading the length field.
const READ_LEN_TIMEOUT_US: u64 = 2_000_000;
/// Inter-byte timeout while reading payload bytes.
const READ_PAYLOAD_TIMEOUT_US: u64 = 8_000_000;
/// Inter-byte timeout while reading the trailing CRC.
const READ_CRC_TIMEOUT_US: u64 = 2_000_000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    SeekMagic,
    ReadLen,
    ReadPayload,
    ReadCrc,
}

/// Incremental parser for host frames.
///
/// Feed it one byte at a time with [`feed`](FrameParser::feed); when a frame
/// has been received and its CRC checked, `feed` returns the payload length
/// and the bytes are available through [`payload`](FrameParser::payload)
/// until the next byte is fed. While the transport is dry the owner must
/// call [`poll_timeout`](FrameParser::poll_timeout) so a stalled sender
/// cannot park the parser mid-frame forever.
///
/// The payload buffer is sized at compile time for the largest legal frame;
/// nothing is allocated per frame.
pub struct FrameParser {
    state: State,
    sync: [u8; 4],
    scratch: [u8; 4],
    scratch_pos: usize,
    payload: [u8; MAX_PAYLOAD],
    payload_len: usize,
    payload_pos: usize,
    crc: Crc32,
    deadline_us: u64,
}

impl FrameParser {
    /// Parser in its hunting state.
    pub fn new() -> Self {
        FrameParser {
            state: State::SeekMagic,
            sync: [0; 4],
            scratch: [0; 4],
            scratch_pos: 0,
            payload: [0; MAX_PAYLOAD],
            payload_len: 0,
            payload_pos: 0,
            crc: Crc32::new(),
            deadline_us: 0,
        }
    }

    /// Consume one transport byte at time `now_us`.
    ///
    /// Returns `Some(len)` when the byte completed a CRC-valid frame; the
    /// payload is then in [`payload`](FrameParser::payload). Malformed
    /// frames are dropped without a report.
    pub fn feed(&mut self, byte: u8, now_us: u64) -> Option<usize> {
        match self.state {
            State::SeekMagic => {
                self.sync = [self.sync[1], self.sync[2], self.sync[3], byte];
                if self.sync == MAGIC {
                    self.enter(State::ReadLen, now_us);
                }
                None
            }
            State::ReadLen => {
                self.scratch[self.scratch_pos] = byte;
                self.scratch_pos += 1;
                self.deadline_us = now_us + READ_LEN_TIMEOUT_US;
                if self.scratch_pos < 4 {
                    return None;
                }
                let len = u32::from_le_bytes(self.scratch) as usize;
                if len == 0 || len > MAX_PAYLOAD {
                    log::debug!("frame rejected: bad length {}", len);
                    self.state = State::SeekMagic;
                    return None;
                }
                self.payload_len = len;
                self.payload_pos = 0;
                self.crc = Crc32::new();
                self.enter(State::ReadPayload, now_us);
                None
            }
            State::ReadPayload => {
                self.payload[self.payload_pos] = byte;
                self.payload_pos += 1;
                self.crc.update(byte);
                self.deadline_us = now_us + READ_PAYLOAD_TIMEOUT_US;
                if self.payload_pos == self.payload_len {
                    self.enter(State::ReadCrc, now_us);
                }
                None
            }
            State::ReadCrc => {
                self.scratch[self.scratch_pos] = byte;
                self.scratch_pos += 1;
                self.deadline_us = now_us + READ_CRC_TIMEOUT_US;
                if self.scratch_pos < 4 {
                    return None;
                }
                self.state = State::SeekMagic;
                let crc_rx = u32::from_le_bytes(self.scratch);
                let crc_calc = self.crc.finalize();
                if crc_rx != crc_calc {
                    log::debug!(
                        "frame rejected: crc mismatch (rx {:08X}, calc {:08X})",
                        crc_rx,
                        crc_calc
                    );
                    return None;
                }
                Some(self.payload_len)
            }
        }
    }

    /// Drop a stalled frame if the current phase's inter-byte deadline has
    /// passed. Call whenever the transport has no byte to offer.
    pub fn poll_timeout(&mut self, now_us: u64) {
        if self.state != State::SeekMagic && now_us >= self.deadline_us {
            log::debug!("frame dropped: byte timeout in {:?}", self.state);
            self.state = State::SeekMagic;
        }
    }

    /// Payload of the frame most recently completed by [`feed`](FrameParser::feed).
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.payload_len]
    }

    fn enter(&mut self, state: State, now_us: u64) {
        self.deadline_us = now_us
            + match state {
                State::ReadLen => READ_LEN_TIMEOUT_US,
                State::ReadPayload => READ_PAYLOAD_TIMEOUT_US,
                State::ReadCrc => READ_CRC_TIMEOUT_US,
                State::SeekMagic => 0,
            };
        self.scratch_pos = 0;
        self.state = state;
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}
