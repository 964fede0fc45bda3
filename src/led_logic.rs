//! Two-colour LED feedback policy.
//!
//! The hardware exposes two independent intensity channels (green and
//! amber).  `LedFeedbackDriver` maps a [`FeedbackColor`] onto them at a
//! fixed calibrated brightness.  Feedback is best-effort: a failed write
//! is logged and otherwise ignored, never retried.

use crate::config::{AMBER_LED_PWM_PCT, GREEN_LED_PWM_PCT};
use crate::error::Error;

/// A physical LED intensity channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedChannel {
    Green,
    Amber,
}

/// Colour shown to the wearer after a press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedbackColor {
    #[default]
    Off,
    /// Reading at or above the mild threshold.
    Green,
    /// Reading below the threshold, or no valid reading.
    Amber,
}

impl FeedbackColor {
    /// Channel that carries this colour, `None` for `Off`.
    pub fn channel(self) -> Option<LedChannel> {
        match self {
            FeedbackColor::Off => None,
            FeedbackColor::Green => Some(LedChannel::Green),
            FeedbackColor::Amber => Some(LedChannel::Amber),
        }
    }

    /// Calibrated brightness tier (percent).
    pub fn brightness_pct(self) -> u8 {
        match self {
            FeedbackColor::Off => 0,
            FeedbackColor::Green => GREEN_LED_PWM_PCT,
            FeedbackColor::Amber => AMBER_LED_PWM_PCT,
        }
    }
}

/// LED capability: per-channel brightness control.
pub trait LedChannels {
    /// Drive `channel` at `percent` (0-100) brightness.
    fn set_brightness(&mut self, channel: LedChannel, percent: u8) -> Result<(), Error>;

    /// Switch `channel` off.
    fn off(&mut self, channel: LedChannel) -> Result<(), Error>;
}

/// Drives the indicator LEDs for button feedback.
pub struct LedFeedbackDriver<C> {
    channels: C,
    lit: FeedbackColor,
}

impl<C: LedChannels> LedFeedbackDriver<C> {
    pub fn new(channels: C) -> Self {
        Self {
            channels,
            lit: FeedbackColor::Off,
        }
    }

    /// Light `color` at its brightness tier.
    ///
    /// The other channel is left untouched.  `Off` is the same as
    /// [`all_off`](Self::all_off).
    pub fn show_color(&mut self, color: FeedbackColor) {
        let Some(channel) = color.channel() else {
            self.all_off();
            return;
        };

        let pct = color.brightness_pct();
        match self.channels.set_brightness(channel, pct) {
            Ok(()) => debug!("{:?} LED on ({}%)", channel, pct),
            Err(e) => error!(
                "Failed to set {:?} LED brightness to {}%: {:?}",
                channel,
                pct,
                e
            ),
        }
        // Best-effort: the wearer may not see it, but the state machine
        // carries on as if they did.
        self.lit = color;
    }

    /// Switch both channels off.  Always issues both writes.
    pub fn all_off(&mut self) {
        for channel in [LedChannel::Green, LedChannel::Amber] {
            match self.channels.off(channel) {
                Ok(()) => debug!("{:?} LED off", channel),
                Err(e) => error!("Failed to turn off {:?} LED: {:?}", channel, e),
            }
        }
        self.lit = FeedbackColor::Off;
    }

    /// Last colour this driver was asked to show.
    pub fn lit(&self) -> FeedbackColor {
        self.lit
    }

    pub fn channels(&self) -> &C {
        &self.channels
    }
}
