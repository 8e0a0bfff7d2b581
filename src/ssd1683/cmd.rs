//! SSD1683 command opcodes.
//!
//! The slave controller half listens on a mirrored bank of opcodes; the
//! pairs line up entry-for-entry with the master bank below.

/// Command opcodes for the controller pair.
pub struct Cmd;

#[allow(missing_docs)]
impl Cmd {
    // Shared
    pub const SW_RESET: u8 = 0x12;
    pub const DEEP_SLEEP_MODE: u8 = 0x10;
    pub const TEMP_CONTROL: u8 = 0x18;
    pub const MASTER_ACTIVATE: u8 = 0x20;
    pub const UPDATE_DISPLAY_CTRL2: u8 = 0x22;
    pub const BORDER_WAVEFORM_CONTROL: u8 = 0x3C;

    // Master half
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SET_RAMXPOS: u8 = 0x44;
    pub const SET_RAMYPOS: u8 = 0x45;
    pub const SET_RAMX_COUNTER: u8 = 0x4E;
    pub const SET_RAMY_COUNTER: u8 = 0x4F;
    pub const WRITE_NEW_DATA: u8 = 0x24;
    pub const WRITE_OLD_DATA: u8 = 0x26;

    // Slave half
    pub const SLAVE_DATA_ENTRY_MODE: u8 = 0x91;
    pub const SLAVE_SET_RAMXPOS: u8 = 0xC4;
    pub const SLAVE_SET_RAMYPOS: u8 = 0xC5;
    pub const SLAVE_SET_RAMX_COUNTER: u8 = 0xCE;
    pub const SLAVE_SET_RAMY_COUNTER: u8 = 0xCF;
    pub const SLAVE_WRITE_NEW_DATA: u8 = 0xA4;
    pub const SLAVE_WRITE_OLD_DATA: u8 = 0xA6;
}
