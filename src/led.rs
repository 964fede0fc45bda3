//! PWM-driven indicator LEDs.
//!
//! Both LEDs hang off one PWM instance: channel 0 is green, channel 1 is
//! amber.  Brightness is a straight percent-of-`PWM_MAX_DUTY` mapping.

use crate::config::PWM_MAX_DUTY;
use crate::error::Error;
use crate::led_logic::{LedChannel, LedChannels};
use embassy_nrf::peripherals::PWM0;
use embassy_nrf::pwm::{Prescaler, SimplePwm};

/// Two-channel PWM LED output.
pub struct PwmLeds {
    pwm: SimplePwm<'static, PWM0>,
}

impl PwmLeds {
    /// Take over an already-constructed two-channel PWM and start dark.
    pub fn new(pwm: SimplePwm<'static, PWM0>) -> Self {
        pwm.set_prescaler(Prescaler::Div1);
        pwm.set_max_duty(PWM_MAX_DUTY);
        let mut leds = Self { pwm };
        leds.write(LedChannel::Green, 0);
        leds.write(LedChannel::Amber, 0);
        leds
    }

    fn index(channel: LedChannel) -> usize {
        match channel {
            LedChannel::Green => 0,
            LedChannel::Amber => 1,
        }
    }

    fn write(&mut self, channel: LedChannel, duty: u16) {
        self.pwm.set_duty(Self::index(channel), duty);
    }
}

/// Percent (clamped to 100) to PWM duty.
fn duty_for(percent: u8) -> u16 {
    let pct = u32::from(percent.min(100));
    (u32::from(PWM_MAX_DUTY) * pct / 100) as u16
}

impl LedChannels for PwmLeds {
    fn set_brightness(&mut self, channel: LedChannel, percent: u8) -> Result<(), Error> {
        if !self.pwm.is_enabled() {
            return Err(Error::Led);
        }
        self.write(channel, duty_for(percent));
        Ok(())
    }

    fn off(&mut self, channel: LedChannel) -> Result<(), Error> {
        if !self.pwm.is_enabled() {
            return Err(Error::Led);
        }
        self.write(channel, 0);
        Ok(())
    }
}
