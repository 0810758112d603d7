//! The tick interrupt: divide the sub-tick rate down to seconds, advance
//! the clock and produce the next meter frame.

use crate::config::{SUB_SECOND_STEPS, SUB_TICK_HZ};
use crate::meter::{render, MeterFrame};
use crate::time::{ScaledClock, TimeOfDay};

/// Counts sub-ticks and reports `steps_per_second` of them every second.
///
/// When the source rate is not a multiple of the step rate the remainder is
/// carried the way [`crate::millis`] carries its fraction: the threshold is
/// `source_hz / steps_per_second`, one longer for `source_hz % steps_per_second`
/// of the steps, so every run of `steps_per_second` steps spans exactly
/// `source_hz` sub-ticks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubTickDivider {
    count: u16,
    threshold: u16,
    whole: u16,
    fract: u16,
    fract_inc: u16,
    steps: u16,
}

impl SubTickDivider {
    pub const fn new(source_hz: u32, steps_per_second: u32) -> Self {
        assert!(steps_per_second > 0 && steps_per_second <= u16::MAX as u32);
        let whole = source_hz / steps_per_second;
        assert!(whole > 0, "sub-tick source slower than the divider output");
        assert!(whole < u16::MAX as u32, "divider threshold too large");

        let fract_inc = source_hz % steps_per_second;
        // The first step is never a long one: fract_inc < steps_per_second.
        SubTickDivider {
            count: 0,
            threshold: whole as u16,
            whole: whole as u16,
            fract: fract_inc as u16,
            fract_inc: fract_inc as u16,
            steps: steps_per_second as u16,
        }
    }

    /// Count one sub-tick; true when the threshold is reached, which also
    /// resets the count and picks the next threshold.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count < self.threshold {
            return false;
        }
        self.count = 0;

        self.fract += self.fract_inc;
        if self.fract >= self.steps {
            self.fract -= self.steps;
            self.threshold = self.whole + 1;
        } else {
            self.threshold = self.whole;
        }
        true
    }
}

/// Everything the tick interrupt owns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeterClock {
    clock: ScaledClock,
    divider: SubTickDivider,
    sub_second: u8,
}

impl MeterClock {
    pub const fn new(clock: ScaledClock, divider: SubTickDivider) -> Self {
        MeterClock {
            clock,
            divider,
            sub_second: 0,
        }
    }

    /// Clock seeded from the RTC, divided for the configured sub-tick source.
    pub const fn seeded(time: TimeOfDay) -> Self {
        MeterClock::new(
            ScaledClock::from_time_of_day(time),
            SubTickDivider::new(SUB_TICK_HZ, SUB_SECOND_STEPS),
        )
    }

    pub const fn clock(&self) -> ScaledClock {
        self.clock
    }

    pub const fn frame(&self) -> MeterFrame {
        render(&self.clock, self.sub_second)
    }

    /// Handle one sub-tick interrupt.
    ///
    /// Returns the frame to display whenever the divider fires. The clock
    /// advances one second each time the sub-second counter wraps to zero.
    pub fn on_subtick(&mut self) -> Option<MeterFrame> {
        if !self.divider.tick() {
            return None;
        }

        self.sub_second = self.sub_second.wrapping_add(1);
        if self.sub_second == 0 {
            self.clock.advance_second();
        }
        Some(self.frame())
    }
}
