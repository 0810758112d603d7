//! Time source: a DS3231-family RTC on the I2C bus.
//!
//! The time is read once at startup. After that the clock runs from the tick
//! interrupt alone and the RTC is never consulted again.

use embedded_hal::i2c::I2c;

use crate::bcd::{bcd_to_decimal, decode_hours, HourMode};
use crate::config::RTC_ADDRESS;
use crate::time::TimeOfDay;

const SECONDS_REGISTER: u8 = 0x00;
const CONTROL_REGISTER: u8 = 0x0E;

/// Rate-select bits of the control register. INTCN stays clear so the
/// INT/SQW pin carries the square wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SquareWave {
    Hz1,
    Hz1024,
    Hz4096,
    Hz8192,
}

impl SquareWave {
    pub const fn control_bits(self) -> u8 {
        match self {
            SquareWave::Hz1 => 0b0000_0000,
            SquareWave::Hz1024 => 0b0000_1000,
            SquareWave::Hz4096 => 0b0001_0000,
            SquareWave::Hz8192 => 0b0001_1000,
        }
    }

    pub const fn hz(self) -> u32 {
        match self {
            SquareWave::Hz1 => 1,
            SquareWave::Hz1024 => 1024,
            SquareWave::Hz4096 => 4096,
            SquareWave::Hz8192 => 8192,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RtcReading {
    pub time: TimeOfDay,
    pub mode: HourMode,
}

/// Read hours, minutes and seconds, retrying until the device answers.
///
/// There is no other time source, so a missing RTC hangs here.
pub fn read_time_of_day<I: I2c>(i2c: &mut I) -> RtcReading {
    loop {
        if let Ok(reading) = try_read_time_of_day(i2c) {
            return reading;
        }
    }
}

/// One attempt at the read transaction.
///
/// `write_read` selects the seconds register, re-addresses the device for
/// reading with a repeated start, NAKs the last of the three bytes and
/// releases the bus, on failure as well.
pub fn try_read_time_of_day<I: I2c>(i2c: &mut I) -> Result<RtcReading, I::Error> {
    let mut registers = [0u8; 3];
    i2c.write_read(RTC_ADDRESS, &[SECONDS_REGISTER], &mut registers)?;
    let [seconds, minutes, hours] = registers;

    let (hours, mode) = decode_hours(hours);
    Ok(RtcReading {
        time: TimeOfDay::new(hours, bcd_to_decimal(minutes), bcd_to_decimal(seconds)),
        mode,
    })
}

/// Program the INT/SQW output. Used when sub-ticks come from the RTC.
pub fn enable_square_wave<I: I2c>(i2c: &mut I, rate: SquareWave) -> Result<(), I::Error> {
    i2c.write(RTC_ADDRESS, &[CONTROL_REGISTER, rate.control_bits()])
}
