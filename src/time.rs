use ufmt::{uDisplay, uWrite, Formatter};

use crate::config::METER_BITS;

/// Plain decimal time of day, as read from the RTC.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeOfDay {
    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Self {
        TimeOfDay {
            hours,
            minutes,
            seconds,
        }
    }
}

impl uDisplay for TimeOfDay {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        write_two_digits(f, self.hours)?;
        f.write_char(':')?;
        write_two_digits(f, self.minutes)?;
        f.write_char(':')?;
        write_two_digits(f, self.seconds)
    }
}

fn write_two_digits<W>(f: &mut Formatter<'_, W>, value: u8) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    if value < 10 {
        f.write_char('0')?;
    }
    uDisplay::fmt(&value, f)
}

/// Fixed-point representation of one unit of the time of day.
///
/// A unit counts `0..=max` in steps of `step` ticks inside a 16-bit counter.
/// The meter reading is the counter shifted right by `shift`, so rendering is
/// a shift rather than a division.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeterScale {
    pub max: u8,
    pub step: u16,
    pub shift: u8,
}

impl MeterScale {
    /// Derive the largest step for which one more step past `max` still fits
    /// the counter, and the shift that maps the counter onto `output_bits`.
    ///
    /// Panics (at compile time when used in a const) if either bound fails.
    pub const fn derive(max: u8, output_bits: u8) -> Self {
        assert!(output_bits > 0 && output_bits <= u8::BITS as u8, "output wider than a compare register");

        let step = u16::MAX / (max as u16 + 1);
        let scale = MeterScale {
            max,
            step,
            shift: u16::BITS as u8 - output_bits,
        };

        assert!(step > 0, "unit does not fit the counter");
        assert!(
            scale.limit() as u32 + step as u32 <= u16::MAX as u32,
            "rollover check would overflow"
        );
        assert!(
            (scale.limit() >> scale.shift) as u32 <= (1u32 << output_bits) - 1,
            "meter reading exceeds output width"
        );
        scale
    }

    /// Largest in-range tick count.
    pub const fn limit(&self) -> u16 {
        self.max as u16 * self.step
    }

    /// Ticks for a decimal value, clamped to `max`.
    pub const fn ticks(&self, value: u8) -> u16 {
        let value = if value > self.max { self.max } else { value };
        value as u16 * self.step
    }

    pub const fn reading(&self, ticks: u16) -> u8 {
        (ticks >> self.shift) as u8
    }

    /// Whole units contained in `ticks`.
    pub const fn units(&self, ticks: u16) -> u8 {
        (ticks / self.step) as u8
    }
}

pub const SECONDS: MeterScale = MeterScale::derive(59, METER_BITS);
pub const MINUTES: MeterScale = MeterScale::derive(59, METER_BITS);
pub const HOURS: MeterScale = MeterScale::derive(23, METER_BITS);

/// Seconds, minutes and hours held as ticks of their [`MeterScale`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScaledClock {
    seconds: u16,
    minutes: u16,
    hours: u16,
}

impl ScaledClock {
    pub const fn from_time_of_day(time: TimeOfDay) -> Self {
        ScaledClock {
            seconds: SECONDS.ticks(time.seconds),
            minutes: MINUTES.ticks(time.minutes),
            hours: HOURS.ticks(time.hours),
        }
    }

    /// Build from raw tick counts, clamping each to its unit's limit.
    pub const fn from_ticks(seconds: u16, minutes: u16, hours: u16) -> Self {
        const fn clamp(ticks: u16, scale: MeterScale) -> u16 {
            if ticks > scale.limit() {
                scale.limit()
            } else {
                ticks
            }
        }
        ScaledClock {
            seconds: clamp(seconds, SECONDS),
            minutes: clamp(minutes, MINUTES),
            hours: clamp(hours, HOURS),
        }
    }

    pub const fn seconds_ticks(&self) -> u16 {
        self.seconds
    }

    pub const fn minutes_ticks(&self) -> u16 {
        self.minutes
    }

    pub const fn hours_ticks(&self) -> u16 {
        self.hours
    }

    pub const fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::new(
            HOURS.units(self.hours),
            MINUTES.units(self.minutes),
            SECONDS.units(self.seconds),
        )
    }

    /// Add one second and carry into minutes, hours and the next day.
    ///
    /// A unit rolls over on the step that takes it past its limit, never on
    /// reaching the limit itself.
    pub fn advance_second(&mut self) {
        self.seconds += SECONDS.step;
        if self.seconds <= SECONDS.limit() {
            return;
        }
        self.seconds = 0;

        self.minutes += MINUTES.step;
        if self.minutes <= MINUTES.limit() {
            return;
        }
        self.minutes = 0;

        self.hours += HOURS.step;
        if self.hours <= HOURS.limit() {
            return;
        }
        self.hours = 0;
    }
}
