//! Button gesture state machine.
//!
//! One active-high button drives two behaviours:
//!
//! - **Press** - read the die temperature, light green (≥ 20 °C) or
//!   amber (below, or unreadable) and start a 5 s LED window.
//! - **Long press** - holding for 18 s hands a shutdown request to the
//!   worker context, which cuts power.
//!
//! ```text
//! WatchingPress   --rising edge-->  WatchingRelease  [show colour, arm both timers]
//! WatchingRelease --falling edge--> WatchingPress    [cancel long-press timer]
//! LED timer expiry        -> both LEDs off (any state)
//! Long-press timer expiry -> shutdown handed off (never performed here)
//! ```
//!
//! The controller is a plain owned value.  Edge handlers and timer
//! expiries are entry points called by whoever owns it (the gesture task
//! on target, a simulated clock in tests), so they never interleave.
//! Exactly one edge is armed at a time and [`rearm`] is the only code
//! that talks to the edge capability.
//!
//! [`rearm`]: ButtonGestureController::rearm

pub mod timer;

#[cfg(test)]
mod tests;

use crate::config::{LED_WINDOW_MS, LONG_PRESS_MS, TEMP_MILD_CELSIUS};
use crate::error::Error;
use crate::led_logic::{LedChannels, LedFeedbackDriver};
use timer::OneShotTimer;

pub use crate::led_logic::FeedbackColor;

/// Signal transition on the button pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
}

/// Which edge the controller is currently armed for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// Button up, waiting for the rising edge.
    #[default]
    WatchingPress,
    /// Button held, waiting for the falling edge.
    WatchingRelease,
}

impl ButtonState {
    pub fn watched_edge(self) -> Edge {
        match self {
            ButtonState::WatchingPress => Edge::Rising,
            ButtonState::WatchingRelease => Edge::Falling,
        }
    }
}

/// Edge-interrupt capability for the button pin.
pub trait EdgeWatch {
    /// Arm `edge`, replacing whatever edge was armed before.
    fn configure_edge(&mut self, edge: Edge) -> Result<(), Error>;
}

/// Temperature capability.
pub trait TemperatureProbe {
    /// Synchronous read in degrees Celsius.
    fn read_celsius(&mut self) -> Result<f32, Error>;
}

/// Outcome of handing a shutdown to the worker context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Handoff {
    Queued,
    /// A request is already waiting; nothing new was queued.
    AlreadyPending,
}

/// Single-slot hand-off into the shutdown worker.  Must not block.
pub trait ShutdownHandoff {
    fn submit(&mut self) -> Handoff;
}

/// Pick the feedback colour for a reading.
///
/// An unreadable sensor (or a NaN sample) is treated as below threshold.
pub fn select_color(reading: Result<f32, Error>) -> FeedbackColor {
    match reading {
        Ok(t) if t >= TEMP_MILD_CELSIUS => FeedbackColor::Green,
        Ok(_) => FeedbackColor::Amber,
        Err(_) => FeedbackColor::Amber,
    }
}

/// Owns the edge watch, both gesture timers and the shutdown hand-off.
pub struct ButtonGestureController<E, C, T, S> {
    edges: E,
    leds: LedFeedbackDriver<C>,
    probe: T,
    shutdown: S,
    state: ButtonState,
    led_timer: OneShotTimer,
    long_press_timer: OneShotTimer,
}

impl<E, C, T, S> ButtonGestureController<E, C, T, S>
where
    E: EdgeWatch,
    C: LedChannels,
    T: TemperatureProbe,
    S: ShutdownHandoff,
{
    /// Build the controller.  Nothing is armed until [`start`](Self::start).
    pub fn new(edges: E, leds: LedFeedbackDriver<C>, probe: T, shutdown: S) -> Self {
        Self {
            edges,
            leds,
            probe,
            shutdown,
            state: ButtonState::WatchingPress,
            led_timer: OneShotTimer::new(LED_WINDOW_MS),
            long_press_timer: OneShotTimer::new(LONG_PRESS_MS),
        }
    }

    /// Arm the initial rising-edge watch.
    ///
    /// On failure the button feature is unavailable; the caller logs and
    /// carries on without it.
    pub fn start(&mut self) -> Result<(), Error> {
        self.state = ButtonState::WatchingPress;
        self.edges.configure_edge(Edge::Rising).inspect_err(|e| {
            error!("Failed to configure button interrupt: {:?}", e);
        })
    }

    /// Dispatch an observed edge according to the watched direction.
    pub fn on_edge(&mut self, now_ms: u64) {
        match self.state {
            ButtonState::WatchingPress => self.on_rising_edge(now_ms),
            ButtonState::WatchingRelease => self.on_falling_edge(),
        }
    }

    /// Button pressed.
    pub fn on_rising_edge(&mut self, now_ms: u64) {
        if self.state != ButtonState::WatchingPress {
            debug!("Ignoring rising edge while watching release");
            return;
        }
        info!("Button pressed");

        let reading = self.probe.read_celsius();
        match reading {
            Ok(t) => info!("temperature is {}C", t),
            Err(e) => warn!("Temperature read failed: {:?}", e),
        }

        let color = select_color(reading);
        let lit = self.leds.lit();
        if lit != FeedbackColor::Off && lit != color {
            // Previous window still open with the other colour.
            self.leds.all_off();
        }
        self.leds.show_color(color);

        self.long_press_timer.start(now_ms);
        self.led_timer.start(now_ms);

        if self.rearm(ButtonState::WatchingRelease).is_err() {
            // Without a release watch a short press looks like a long one.
            self.long_press_timer.stop();
            warn!("Release not observable, long press disabled for this press");
        }
    }

    /// Button released.
    pub fn on_falling_edge(&mut self) {
        if self.state != ButtonState::WatchingRelease {
            debug!("Ignoring falling edge while watching press");
            return;
        }
        info!("Button released");

        if self.long_press_timer.stop() {
            debug!("Long-press timer cancelled");
        }

        // On failure the state stays WatchingRelease and the swap is
        // retried on the next observed edge.
        let _ = self.rearm(ButtonState::WatchingPress);
    }

    /// LED window elapsed.  Unconditional and idempotent.
    pub fn on_led_timer_expiry(&mut self) {
        self.led_timer.stop();
        self.leds.all_off();
    }

    /// Long-press window elapsed.  Only queues work; the kill write
    /// happens in the worker context.
    pub fn on_long_press_timer_expiry(&mut self) {
        self.long_press_timer.stop();
        match self.shutdown.submit() {
            Handoff::Queued => info!("Long press - shutdown submitted"),
            Handoff::AlreadyPending => debug!("Long press - shutdown already pending"),
        }
    }

    /// Fire every timer due at `now_ms`, earliest deadline first (LED
    /// first on a tie).  Returns how many expiries ran.
    pub fn service_timers(&mut self, now_ms: u64) -> u8 {
        let mut fired = 0;
        loop {
            let led_due = self.led_timer.is_due(now_ms);
            let long_due = self.long_press_timer.is_due(now_ms);
            match (led_due, long_due) {
                (false, false) => return fired,
                (true, true)
                    if self.long_press_timer.deadline() < self.led_timer.deadline() =>
                {
                    self.on_long_press_timer_expiry()
                }
                (true, _) => self.on_led_timer_expiry(),
                (false, true) => self.on_long_press_timer_expiry(),
            }
            fired += 1;
        }
    }

    /// Swap the armed edge.  The represented state only changes once the
    /// hardware is actually armed for the new direction.
    fn rearm(&mut self, next: ButtonState) -> Result<(), Error> {
        let edge = next.watched_edge();
        self.edges
            .configure_edge(edge)
            .map(|()| self.state = next)
            .inspect_err(|e| error!("Failed to configure {:?} edge interrupt: {:?}", edge, e))
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn led_deadline(&self) -> Option<u64> {
        self.led_timer.deadline()
    }

    pub fn long_press_deadline(&self) -> Option<u64> {
        self.long_press_timer.deadline()
    }

    pub fn leds(&self) -> &LedFeedbackDriver<C> {
        &self.leds
    }

    pub fn edge_watch(&self) -> &E {
        &self.edges
    }

    /// Mutable access for awaiting the armed edge on target.
    pub fn edge_watch_mut(&mut self) -> &mut E {
        &mut self.edges
    }

    pub fn probe_mut(&mut self) -> &mut T {
        &mut self.probe
    }

    pub fn handoff(&self) -> &S {
        &self.shutdown
    }

    pub fn handoff_mut(&mut self) -> &mut S {
        &mut self.shutdown
    }
}
