#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

// The firmware only exists for the AVR target; host builds carry the library
// and its tests.
#[cfg(not(target_arch = "avr"))]
fn main() {}

#[cfg(target_arch = "avr")]
mod firmware {
    #[cfg(feature = "ext-tick")]
    use arduino_hal::pac::EXINT;
    use arduino_hal::pac::TC0;
    use arduino_hal::prelude::*;
    use arduino_hal::simple_pwm::{IntoPwmPin, Prescaler, Timer1Pwm, Timer2Pwm};
    use panic_halt as _;
    use ufmt::uwriteln;

    use panel_meter_clock::bcd::HourMode;
    use panel_meter_clock::board::meters::Meters;
    use panel_meter_clock::config;
    use panel_meter_clock::millis::{elapsed_since, SharedMillis};
    use panel_meter_clock::rtc;
    use panel_meter_clock::shared::SharedClock;
    use panel_meter_clock::tick::MeterClock;

    const _: () = {
        use arduino_hal::clock::Clock;
        assert!(config::CPU_HZ == arduino_hal::DefaultClock::FREQ);
    };

    // global mutable state
    static CLOCK: SharedClock<Meters> = SharedClock::new();
    static MILLIS: SharedMillis =
        SharedMillis::for_overflow(config::CPU_HZ, config::TIMER_PRESCALER, config::PWM_TOP);

    #[arduino_hal::entry]
    fn main() -> ! {
        let dp = arduino_hal::Peripherals::take().unwrap();
        let pins = arduino_hal::pins!(dp);
        let mut serial = arduino_hal::default_serial!(dp, pins, config::SERIAL_BAUD);

        uwriteln!(&mut serial, "panel meter clock\r").unwrap_infallible();

        // The RTC breakout carries its own pull-ups; the internal ones only help
        // when it is missing.
        let mut i2c = arduino_hal::I2c::new(
            dp.TWI,
            pins.a4.into_pull_up_input(),
            pins.a5.into_pull_up_input(),
            config::TWI_BITRATE_HZ,
        );

        let reading = rtc::read_time_of_day(&mut i2c);
        if let HourMode::Twelve { pm } = reading.mode {
            uwriteln!(
                &mut serial,
                "warning: RTC is in 12-hour mode (pm = {}), converted to 24-hour\r",
                pm
            )
            .unwrap_infallible();
        }
        uwriteln!(&mut serial, "RTC time {} {:?}\r", reading.time, reading.mode).unwrap_infallible();

        #[cfg(feature = "ext-tick")]
        let _square_wave = {
            while rtc::enable_square_wave(&mut i2c, config::SQUARE_WAVE).is_err() {}
            let pin = pins.d2.into_pull_up_input();
            rig_int0(&dp.EXINT);
            pin
        };

        let timer1 = Timer1Pwm::new(dp.TC1, Prescaler::Direct);
        let timer2 = Timer2Pwm::new(dp.TC2, Prescaler::Direct);
        let meters = Meters::new(
            pins.d9.into_output().into_pwm(&timer1),
            pins.d10.into_output().into_pwm(&timer1),
            pins.d11.into_output().into_pwm(&timer2),
        );
        #[cfg(feature = "sub-second-meter")]
        let meters = meters.with_sub_second(pins.d3.into_output().into_pwm(&timer2));

        let clock = MeterClock::seeded(reading.time);
        CLOCK.install(clock, meters);

        rig_timer0(&dp.TC0);

        // Enable interrupts globally, not a replacement for the specific interrupt enable
        unsafe {
            // SAFETY: Not inside a critical section and the shared clock has been
            // installed at this point.
            avr_device::interrupt::enable();
        }
        uwriteln!(
            &mut serial,
            "interrupts enabled, {} sub-ticks/s over {} steps\r",
            config::SUB_TICK_HZ,
            config::SUB_SECOND_STEPS
        )
        .unwrap_infallible();

        let mut last_log = MILLIS.millis();
        loop {
            let now = MILLIS.millis();
            if elapsed_since(last_log, now) < config::LOG_INTERVAL_MS {
                continue;
            }
            last_log = now;

            if let Some(snapshot) = CLOCK.snapshot() {
                let frame = snapshot.frame();
                uwriteln!(
                    &mut serial,
                    "{} pwm h={} m={} s={}\r",
                    snapshot.clock().time_of_day(),
                    frame.hours,
                    frame.minutes,
                    frame.seconds
                )
                .unwrap_infallible();
            }
        }
    }

    /// Timer0 runs the same 8-bit fast PWM as the meter timers, without
    /// prescaling, and interrupts on every overflow.
    ///
    /// <https://ww1.microchip.com/downloads/en/DeviceDoc/Atmel-7810-Automotive-Microcontrollers-ATmega328P_Datasheet.pdf>
    /// section 14.9
    fn rig_timer0(tc0: &TC0) {
        tc0.tccr0a().write(|w| w.wgm0().pwm_fast());
        tc0.tccr0b().write(|w| w.cs0().direct());
        tc0.timsk0().write(|w| w.toie0().set_bit()); //enable this specific interrupt
    }

    /// INT0 on the rising edge of the RTC square wave (datasheet section 12.2).
    #[cfg(feature = "ext-tick")]
    fn rig_int0(exint: &EXINT) {
        exint.eicra().write(|w| unsafe { w.bits(0b11) }); // ISC01:ISC00 = rising edge
        exint.eimsk().write(|w| unsafe { w.bits(0b01) }); // INT0
    }

    #[avr_device::interrupt(atmega328p)]
    fn TIMER0_OVF() {
        MILLIS.on_overflow();
        #[cfg(not(feature = "ext-tick"))]
        CLOCK.on_subtick();
    }

    #[cfg(feature = "ext-tick")]
    #[avr_device::interrupt(atmega328p)]
    fn INT0() {
        CLOCK.on_subtick();
    }
}
