//! Meter rendering: scaled counters to PWM compare values.

use crate::time::{ScaledClock, HOURS, MINUTES, SECONDS};

/// One compare value per meter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MeterFrame {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub sub_second: u8,
}

/// Truncating shift of each counter; the needle moves in whole steps of
/// `1 << shift` ticks.
pub const fn render(clock: &ScaledClock, sub_second: u8) -> MeterFrame {
    MeterFrame {
        hours: HOURS.reading(clock.hours_ticks()),
        minutes: MINUTES.reading(clock.minutes_ticks()),
        seconds: SECONDS.reading(clock.seconds_ticks()),
        sub_second,
    }
}

/// Hardware that displays a [`MeterFrame`].
pub trait MeterOutputs {
    fn write(&mut self, frame: &MeterFrame);
}
