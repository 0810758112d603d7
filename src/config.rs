//! Compile-time configuration of the clock and its board.

use crate::rtc::SquareWave;

/// The system clock frequency (in Hertz).
pub const CPU_HZ: u32 = 16_000_000;

/// Counts per period of an 8-bit fast-PWM timer.
pub const PWM_TOP: u32 = 256;
/// The meter timers run without prescaling.
pub const TIMER_PRESCALER: u32 = 1;
pub const TIMER_OVERFLOW_HZ: u32 = overflow_rate(CPU_HZ, TIMER_PRESCALER, PWM_TOP);

/// Divider steps per second; one full turn of the 8-bit sub-second counter.
pub const SUB_SECOND_STEPS: u32 = 256;

/// Square wave requested from the RTC for the `ext-tick` build.
pub const SQUARE_WAVE: SquareWave = SquareWave::Hz1024;

/// Rate at which the sub-tick interrupt fires.
#[cfg(not(feature = "ext-tick"))]
pub const SUB_TICK_HZ: u32 = TIMER_OVERFLOW_HZ;
#[cfg(feature = "ext-tick")]
pub const SUB_TICK_HZ: u32 = SQUARE_WAVE.hz();

/// Width of a PWM compare register.
pub const METER_BITS: u8 = 8;

/// 7-bit bus address of the RTC.
pub const RTC_ADDRESS: u8 = 0x68;
pub const TWI_BITRATE_HZ: u32 = 100_000;

pub const SERIAL_BAUD: u32 = 57_600;
/// How often the idle loop logs the running clock.
pub const LOG_INTERVAL_MS: u32 = 60_000;

/// Overflow interrupts per second of a timer counting `top` steps per period.
pub const fn overflow_rate(clock_hz: u32, prescale: u32, top: u32) -> u32 {
    clock_hz / prescale / top
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_timers_overflow_at_62500_hz() {
        assert_eq!(TIMER_OVERFLOW_HZ, 62_500);
    }

    #[test]
    fn sub_tick_source_is_fast_enough_for_the_sub_second_counter() {
        assert!(SUB_TICK_HZ >= SUB_SECOND_STEPS);
    }
}
