//! The one piece of state shared between the tick interrupt and main code.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::meter::MeterOutputs;
use crate::tick::MeterClock;

struct Installed<O> {
    clock: MeterClock,
    outputs: O,
}

/// The running clock and the meters it drives.
///
/// The tick interrupt is the only writer. Main code reads through
/// [`SharedClock::snapshot`], which copies the state inside a critical
/// section.
pub struct SharedClock<O> {
    state: Mutex<RefCell<Option<Installed<O>>>>,
}

impl<O> SharedClock<O> {
    pub const fn new() -> Self {
        SharedClock {
            state: Mutex::new(RefCell::new(None)),
        }
    }
}

impl<O: MeterOutputs> SharedClock<O> {
    /// Show the seeded time and hand the clock to the tick interrupt.
    ///
    /// Sub-ticks that arrive before this are ignored.
    pub fn install(&self, clock: MeterClock, mut outputs: O) {
        outputs.write(&clock.frame());
        critical_section::with(|cs| {
            *self.state.borrow(cs).borrow_mut() = Some(Installed { clock, outputs });
        });
    }

    /// Tick interrupt body. Advancing and writing the meters happen in the
    /// same critical section, so no frame of a half-carried clock escapes.
    pub fn on_subtick(&self) {
        critical_section::with(|cs| {
            let mut state = self.state.borrow(cs).borrow_mut();
            if let Some(installed) = state.as_mut() {
                if let Some(frame) = installed.clock.on_subtick() {
                    installed.outputs.write(&frame);
                }
            }
        });
    }

    /// A consistent copy of the clock, or `None` before [`SharedClock::install`].
    pub fn snapshot(&self) -> Option<MeterClock> {
        critical_section::with(|cs| {
            self.state
                .borrow(cs)
                .borrow()
                .as_ref()
                .map(|installed| installed.clock)
        })
    }
}

impl<O> Default for SharedClock<O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex as StdMutex};
    use std::thread;

    use super::*;
    use crate::meter::{render, MeterFrame};
    use crate::tick::SubTickDivider;
    use crate::time::{ScaledClock, TimeOfDay};

    /// Stands in for the PWM compare registers.
    #[derive(Clone, Default)]
    struct Registers(Arc<StdMutex<Vec<MeterFrame>>>);

    impl Registers {
        fn frames(&self) -> Vec<MeterFrame> {
            self.0.lock().unwrap().clone()
        }
    }

    impl MeterOutputs for Registers {
        fn write(&mut self, frame: &MeterFrame) {
            self.0.lock().unwrap().push(*frame);
        }
    }

    fn meter_clock(time: TimeOfDay) -> MeterClock {
        MeterClock::new(ScaledClock::from_time_of_day(time), SubTickDivider::new(1024, 256))
    }

    #[test]
    fn sub_ticks_before_install_are_ignored() {
        let shared: SharedClock<Registers> = SharedClock::new();
        shared.on_subtick();
        assert_eq!(shared.snapshot(), None);
    }

    #[test]
    fn install_renders_the_seed_immediately() {
        let registers = Registers::default();
        let shared = SharedClock::new();
        let clock = meter_clock(TimeOfDay::new(13, 5, 45));

        shared.install(clock, registers.clone());

        assert_eq!(registers.frames(), [render(&clock.clock(), 0)]);
        assert_eq!(shared.snapshot(), Some(clock));
    }

    #[test]
    fn registers_are_written_once_per_divider_step() {
        let registers = Registers::default();
        let shared = SharedClock::new();
        shared.install(meter_clock(TimeOfDay::new(0, 0, 0)), registers.clone());

        for _ in 0..1024 {
            shared.on_subtick();
        }

        let frames = registers.frames();
        assert_eq!(frames.len(), 1 + 256);
        let last = frames.last().unwrap();
        assert_eq!(last.sub_second, 0);
        assert_eq!(
            shared.snapshot().unwrap().clock().time_of_day(),
            TimeOfDay::new(0, 0, 1)
        );
    }

    enum Event {
        TimerFired,
        Stop,
    }

    /// A single consumer thread owns the interrupt role; events are handled
    /// one at a time to completion while the test thread takes snapshots.
    #[test]
    fn tick_actor_delivers_a_day_boundary() {
        let registers = Registers::default();
        let shared = Arc::new(SharedClock::new());
        shared.install(meter_clock(TimeOfDay::new(23, 59, 58)), registers.clone());

        let (events, inbox) = mpsc::channel();
        let handler = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let mut handled = 0u32;
                while let Ok(Event::TimerFired) = inbox.recv() {
                    shared.on_subtick();
                    handled += 1;
                }
                handled
            })
        };

        for _ in 0..2 * 1024 {
            events.send(Event::TimerFired).unwrap();
            let snapshot = shared.snapshot().unwrap().clock();
            let time = snapshot.time_of_day();
            assert!(
                time == TimeOfDay::new(23, 59, 58)
                    || time == TimeOfDay::new(23, 59, 59)
                    || time == TimeOfDay::new(0, 0, 0)
            );
        }
        events.send(Event::Stop).unwrap();

        assert_eq!(handler.join().unwrap(), 2 * 1024);
        assert_eq!(shared.snapshot().unwrap().clock(), ScaledClock::default());

        let frames = registers.frames();
        let midnight = frames
            .iter()
            .position(|frame| frame.hours == 0 && frame.minutes == 0 && frame.seconds == 0)
            .unwrap();
        // Every frame before midnight shows 23:59 on the hour and minute meters.
        assert!(frames[..midnight]
            .iter()
            .all(|frame| frame.hours == frames[0].hours && frame.minutes == frames[0].minutes));
    }
}
