//! Parameter values for the SSD1683 commands this driver issues.

/// Command parameter values.
pub struct Flag;

#[allow(missing_docs)]
impl Flag {
    // Data Entry Mode: X increment, Y decrement
    pub const DATA_ENTRY_XINC_YDEC: u8 = 0x05;
    // Slave data entry (0x91) uses its own encoding for the same mode
    pub const SLAVE_DATA_ENTRY_XINC_YDEC: u8 = 0x04;

    // Border Waveform Control (0x3C), vendor value for this glass
    pub const BORDER_WAVEFORM_DEFAULT: u8 = 0x80;

    // Temperature Sensor Control (0x18)
    pub const INTERNAL_TEMP_SENSOR: u8 = 0x80;

    // Display Update Control 2 (0x22) sequences
    pub const UPDATE_MODE_FULL: u8 = 0xF7; // full waveform, clears ghosting
    pub const UPDATE_MODE_PARTIAL: u8 = 0xFF; // partial waveform, needs OLD RAM

    // Deep Sleep Mode (0x10)
    pub const DEEP_SLEEP_NORMAL: u8 = 0x00;
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01;
}
