use arduino_hal::hal::port::{PB1, PB2, PB3, PD3};
use arduino_hal::port::{mode::PwmOutput, Pin};
use arduino_hal::simple_pwm::{Timer1Pwm, Timer2Pwm};

use crate::meter::{MeterFrame, MeterOutputs};

// Pinout
// Meter        Arduino Pin     AVR Pin
// Hours        D9              PB1 / OC1A
// Minutes      D10             PB2 / OC1B
// Seconds      D11             PB3 / OC2A
// Sub-second   D3              PD3 / OC2B
pub type HoursPin = Pin<PwmOutput<Timer1Pwm>, PB1>;
pub type MinutesPin = Pin<PwmOutput<Timer1Pwm>, PB2>;
pub type SecondsPin = Pin<PwmOutput<Timer2Pwm>, PB3>;
pub type SubSecondPin = Pin<PwmOutput<Timer2Pwm>, PD3>;

/// Panel meters on fast-PWM compare outputs.
pub struct Meters {
    hours: HoursPin,
    minutes: MinutesPin,
    seconds: SecondsPin,
    sub_second: Option<SubSecondPin>,
}

impl Meters {
    pub fn new(mut hours: HoursPin, mut minutes: MinutesPin, mut seconds: SecondsPin) -> Self {
        hours.enable();
        minutes.enable();
        seconds.enable();

        Meters {
            hours,
            minutes,
            seconds,
            sub_second: None,
        }
    }

    /// Add the optional fourth meter.
    pub fn with_sub_second(mut self, mut pin: SubSecondPin) -> Self {
        pin.enable();
        self.sub_second = Some(pin);
        self
    }
}

impl MeterOutputs for Meters {
    fn write(&mut self, frame: &MeterFrame) {
        self.hours.set_duty(frame.hours);
        self.minutes.set_duty(frame.minutes);
        self.seconds.set_duty(frame.seconds);
        if let Some(sub_second) = self.sub_second.as_mut() {
            sub_second.set_duty(frame.sub_second);
        }
    }
}
