//! Button input and the task that owns the gesture controller.
//!
//! The wearable button is active-high (pull-down).  `ButtonPin` arms one
//! direction at a time and waits on the *level* the armed edge leads
//! to, so a transition that lands while the watch is being swapped is
//! still seen on the next wait instead of being lost.

use crate::error::Error;
use crate::gesture::{ButtonGestureController, Edge, EdgeWatch};
use crate::led::PwmLeds;
use crate::power::ShutdownSender;
use crate::sensor::DieTemperature;
use embassy_futures::select::{select3, Either3};
use embassy_nrf::gpio::Input;
use embassy_time::{Instant, Timer};

/// Controller as wired on the board.
pub type GestureController = ButtonGestureController<ButtonPin, PwmLeds, DieTemperature, ShutdownSender>;

/// GPIOTE-backed button pin with a single armed edge.
pub struct ButtonPin {
    input: Input<'static>,
    armed: Edge,
}

impl ButtonPin {
    pub fn new(input: Input<'static>) -> Self {
        Self {
            input,
            armed: Edge::Rising,
        }
    }

    /// Resolve once the armed edge has happened.
    pub async fn wait_for_armed_edge(&mut self) {
        match self.armed {
            Edge::Rising => self.input.wait_for_high().await,
            Edge::Falling => self.input.wait_for_low().await,
        }
    }
}

impl EdgeWatch for ButtonPin {
    fn configure_edge(&mut self, edge: Edge) -> Result<(), Error> {
        self.armed = edge;
        Ok(())
    }
}

/// Milliseconds since boot on the embassy time base.
fn now_ms() -> u64 {
    Instant::now().as_millis()
}

fn instant_at(deadline_ms: Option<u64>) -> Instant {
    deadline_ms.map_or(Instant::MAX, Instant::from_millis)
}

/// Single owner of the controller: edges and both timer expiries are
/// handled here one at a time.
///
/// The edge future is polled first, so when a release and the long-press
/// expiry are ready in the same poll the release wins.  Deadlines are
/// re-read on every pass, so a restarted timer never fires stale.
#[embassy_executor::task]
pub async fn gesture_task(mut controller: GestureController) -> ! {
    info!("Gesture task started");

    loop {
        let led_at = instant_at(controller.led_deadline());
        let long_at = instant_at(controller.long_press_deadline());

        let event = select3(
            controller.edge_watch_mut().wait_for_armed_edge(),
            Timer::at(led_at),
            Timer::at(long_at),
        )
        .await;

        match event {
            Either3::First(()) => controller.on_edge(now_ms()),
            Either3::Second(()) => controller.on_led_timer_expiry(),
            Either3::Third(()) => controller.on_long_press_timer_expiry(),
        }
    }
}
