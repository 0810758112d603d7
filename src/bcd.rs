//! Packed binary-coded-decimal fields as the RTC stores them.

use ufmt::derive::uDebug;

/// Set in the hours register when the RTC counts in 12-hour mode.
pub const TWELVE_HOUR_FLAG: u8 = 0b0100_0000;
/// 24-hour mode: the "twenty" digit. 12-hour mode: PM.
const TWENTY_OR_PM: u8 = 0b0010_0000;
const TEN_HOURS: u8 = 0b0001_0000;
const ONES: u8 = 0b0000_1111;

/// Unpack a BCD byte: high nibble is tens, low nibble is ones.
///
/// Nibbles are not validated; `0xFF` decodes to 165.
pub const fn bcd_to_decimal(byte: u8) -> u8 {
    (byte >> 4) * 10 + (byte & ONES)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum HourMode {
    TwentyFour,
    Twelve { pm: bool },
}

/// Decode the hours register into 0-23.
///
/// In 24-hour mode bit 5 counts twenty and bit 4 counts ten. If the device
/// reports 12-hour mode the value is converted instead (12 AM is hour 0) and
/// the mode is returned so the caller can flag it.
pub const fn decode_hours(byte: u8) -> (u8, HourMode) {
    let tens = ((byte & TEN_HOURS) >> 4) * 10;
    let ones = byte & ONES;

    if byte & TWELVE_HOUR_FLAG == 0 {
        let twenty = ((byte & TWENTY_OR_PM) >> 5) * 20;
        (twenty + tens + ones, HourMode::TwentyFour)
    } else {
        let pm = byte & TWENTY_OR_PM != 0;
        let hour = (tens + ones) % 12;
        (if pm { hour + 12 } else { hour }, HourMode::Twelve { pm })
    }
}
