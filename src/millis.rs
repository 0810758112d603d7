//! Milliseconds since boot, advanced from a timer overflow interrupt.
//!
//! Follows Arduino's `millis()`: each overflow adds a whole-millisecond
//! increment plus a remainder kept in units of 8 us, so the remainder fits
//! in a byte.
//!
//! <https://www.arduino.cc/reference/en/language/functions/time/millis/>

use core::cell::Cell;

use critical_section::Mutex;

const MICROS_PER_MILLI: u32 = 1000;
const MICROS_PER_SECOND: u32 = 1_000_000;
const FRACT_MAX: u8 = (MICROS_PER_MILLI >> 3) as u8;

/// Milliseconds since boot, shared between the overflow interrupt and main
/// code.
///
/// Only the overflow handler touches the remainder; main code reads the
/// 32-bit count alone, so its critical section copies four bytes.
pub struct SharedMillis {
    millis: Mutex<Cell<u32>>,
    fract: Mutex<Cell<u8>>,
    millis_inc: u32,
    fract_inc: u8,
}

impl SharedMillis {
    /// Counter for a timer clocked at `cpu_hz / prescaler` that overflows
    /// every `counts` steps.
    pub const fn for_overflow(cpu_hz: u32, prescaler: u32, counts: u32) -> Self {
        let cycles_per_micro = cpu_hz / MICROS_PER_SECOND;
        assert!(cycles_per_micro > 0, "clock slower than 1 MHz");
        let micros_per_overflow = prescaler * counts / cycles_per_micro;

        SharedMillis {
            millis: Mutex::new(Cell::new(0)),
            fract: Mutex::new(Cell::new(0)),
            millis_inc: micros_per_overflow / MICROS_PER_MILLI,
            fract_inc: ((micros_per_overflow % MICROS_PER_MILLI) >> 3) as u8,
        }
    }

    /// Overflow interrupt body.
    pub fn on_overflow(&self) {
        critical_section::with(|cs| {
            let millis = self.millis.borrow(cs);
            let fract = self.fract.borrow(cs);

            let mut m = millis.get().wrapping_add(self.millis_inc);
            let mut f = fract.get() + self.fract_inc;
            if f >= FRACT_MAX {
                f -= FRACT_MAX;
                m = m.wrapping_add(1);
            }
            millis.set(m);
            fract.set(f);
        });
    }

    /// Milliseconds since boot. The 32-bit value is read with interrupts
    /// held off so it is never torn by the overflow handler.
    pub fn millis(&self) -> u32 {
        critical_section::with(|cs| self.millis.borrow(cs).get())
    }
}

/// Milliseconds from `start` to `now`, correct across one wrap of the counter.
pub const fn elapsed_since(start: u32, now: u32) -> u32 {
    now.wrapping_sub(start)
}
