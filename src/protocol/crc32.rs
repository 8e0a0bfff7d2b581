//! CRC-32/IEEE (reflected, poly 0xEDB88320) without a lookup table.
//!
//! The frames on the wire are at most ~27 KiB and arrive byte-by-byte from
//! the transport, so the bitwise form is folded in as bytes are consumed
//! instead of paying 1 KiB of flash for a table.

const POLY: u32 = 0xEDB8_8320;

/// Incremental CRC-32 state.
///
/// `Crc32::new()` starts at the 0xFFFFFFFF preset; [`finalize`](Crc32::finalize)
/// applies the final XOR. The parser keeps one of these per frame so the
/// payload never has to be re-walked after reception.
#[derive(Clone, Copy)]
pub struct Crc32(u32);

impl Crc32 {
    /// Fresh CRC state.
    pub fn new() -> Self {
        Crc32(0xFFFF_FFFF)
    }

    /// Fold one byte into the running CRC.
    pub fn update(&mut self, byte: u8) {
        let mut crc = self.0 ^ u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (POLY & mask);
        }
        self.0 = crc;
    }

    /// Final XOR; the state itself is left untouched.
    pub fn finalize(&self) -> u32 {
        self.0 ^ 0xFFFF_FFFF
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot CRC-32 of `bytes`.
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    for &b in bytes {
        crc.update(b);
    }
    crc.finalize()
}
