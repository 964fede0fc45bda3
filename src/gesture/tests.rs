//! Unit tests for the gesture state machine.
//!
//! These run on the host with recording fakes for every capability and
//! a hand-driven millisecond clock.

use super::*;
use crate::led_logic::LedChannel;

// ═══════════════════════════════════════════════════════════════════════════
// Fakes
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct FakeEdges {
    armed: Vec<Edge>,
    fail_next: bool,
}

impl EdgeWatch for FakeEdges {
    fn configure_edge(&mut self, edge: Edge) -> Result<(), Error> {
        if core::mem::take(&mut self.fail_next) {
            return Err(Error::EdgeConfig);
        }
        self.armed.push(edge);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LedOp {
    Set(LedChannel, u8),
    Off(LedChannel),
}

#[derive(Default)]
struct FakeLeds {
    ops: Vec<LedOp>,
    fail: bool,
}

impl FakeLeds {
    fn result(&self) -> Result<(), Error> {
        if self.fail {
            Err(Error::Led)
        } else {
            Ok(())
        }
    }
}

impl LedChannels for FakeLeds {
    fn set_brightness(&mut self, channel: LedChannel, percent: u8) -> Result<(), Error> {
        self.ops.push(LedOp::Set(channel, percent));
        self.result()
    }

    fn off(&mut self, channel: LedChannel) -> Result<(), Error> {
        self.ops.push(LedOp::Off(channel));
        self.result()
    }
}

struct FakeProbe {
    reading: Result<f32, Error>,
}

#[derive(Default)]
struct FakeHandoff {
    submissions: u32,
    pending: bool,
}

impl FakeHandoff {
    fn drain(&mut self) {
        self.pending = false;
    }
}

impl TemperatureProbe for FakeProbe {
    fn read_celsius(&mut self) -> Result<f32, Error> {
        self.reading
    }
}

impl ShutdownHandoff for FakeHandoff {
    fn submit(&mut self) -> Handoff {
        if self.pending {
            return Handoff::AlreadyPending;
        }
        self.pending = true;
        self.submissions += 1;
        Handoff::Queued
    }
}

type Controller = ButtonGestureController<FakeEdges, FakeLeds, FakeProbe, FakeHandoff>;

fn controller(celsius: f32) -> Controller {
    let mut c = ButtonGestureController::new(
        FakeEdges::default(),
        LedFeedbackDriver::new(FakeLeds::default()),
        FakeProbe {
            reading: Ok(celsius),
        },
        FakeHandoff::default(),
    );
    c.start().unwrap();
    c
}

fn led_ops(c: &Controller) -> &[LedOp] {
    &c.leds().channels().ops
}

fn submissions(c: &Controller) -> u32 {
    c.handoff().submissions
}

// ═══════════════════════════════════════════════════════════════════════════
// Colour selection
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn select_color_threshold_is_inclusive() {
    assert_eq!(select_color(Ok(20.0)), FeedbackColor::Green);
    assert_eq!(select_color(Ok(36.5)), FeedbackColor::Green);
    assert_eq!(select_color(Ok(19.99)), FeedbackColor::Amber);
    assert_eq!(select_color(Ok(-40.0)), FeedbackColor::Amber);
}

#[test]
fn select_color_sensor_failure_is_amber() {
    assert_eq!(select_color(Err(Error::Sensor)), FeedbackColor::Amber);
    assert_eq!(select_color(Ok(f32::NAN)), FeedbackColor::Amber);
}

#[test]
fn warm_press_shows_green_only() {
    let mut c = controller(25.0);
    c.on_rising_edge(0);
    assert_eq!(led_ops(&c), [LedOp::Set(LedChannel::Green, 100)]);
    assert_eq!(c.leds().lit(), FeedbackColor::Green);
}

#[test]
fn cold_press_shows_amber_only() {
    let mut c = controller(15.0);
    c.on_rising_edge(0);
    assert_eq!(led_ops(&c), [LedOp::Set(LedChannel::Amber, 30)]);
}

#[test]
fn unreadable_sensor_press_shows_amber() {
    let mut c = controller(0.0);
    c.probe_mut().reading = Err(Error::Sensor);
    c.on_rising_edge(0);
    assert_eq!(c.leds().lit(), FeedbackColor::Amber);
}

#[test]
fn colour_change_between_presses_clears_previous_colour() {
    let mut c = controller(15.0);
    c.on_rising_edge(0);
    c.on_falling_edge();
    c.probe_mut().reading = Ok(22.0);
    c.on_rising_edge(1_000);
    assert_eq!(
        led_ops(&c),
        [
            LedOp::Set(LedChannel::Amber, 30),
            LedOp::Off(LedChannel::Green),
            LedOp::Off(LedChannel::Amber),
            LedOp::Set(LedChannel::Green, 100),
        ]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Edge alternation
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn start_arms_rising_edge() {
    let c = controller(25.0);
    assert_eq!(c.state(), ButtonState::WatchingPress);
    assert_eq!(c.edge_watch().armed, [Edge::Rising]);
}

#[test]
fn edges_strictly_alternate() {
    let mut c = controller(25.0);
    c.on_edge(0);
    assert_eq!(c.state(), ButtonState::WatchingRelease);
    c.on_edge(100);
    assert_eq!(c.state(), ButtonState::WatchingPress);
    c.on_edge(200);
    assert_eq!(
        c.edge_watch().armed,
        [Edge::Rising, Edge::Falling, Edge::Rising, Edge::Falling]
    );
}

#[test]
fn spurious_edges_are_ignored() {
    let mut c = controller(25.0);
    c.on_falling_edge();
    assert_eq!(c.state(), ButtonState::WatchingPress);
    assert_eq!(c.edge_watch().armed, [Edge::Rising]);

    c.on_rising_edge(0);
    c.on_rising_edge(10);
    assert_eq!(led_ops(&c).len(), 1);
    assert_eq!(c.led_deadline(), Some(LED_WINDOW_MS));
}

#[test]
fn failed_rearm_keeps_previous_state() {
    let mut c = controller(25.0);
    c.edge_watch_mut().fail_next = true;
    c.on_rising_edge(0);
    assert_eq!(c.state(), ButtonState::WatchingPress);
    // Visible feedback is not rolled back.
    assert_eq!(c.leds().lit(), FeedbackColor::Green);
    assert_eq!(c.led_deadline(), Some(5_000));
    // A release could never be seen, so no long press is tracked.
    assert_eq!(c.long_press_deadline(), None);
}

#[test]
fn short_press_with_failed_release_watch_never_shuts_down() {
    let mut c = controller(25.0);
    c.edge_watch_mut().fail_next = true;
    c.on_rising_edge(0);
    c.on_falling_edge();
    c.service_timers(18_000);
    assert_eq!(c.state(), ButtonState::WatchingPress);
    assert_eq!(submissions(&c), 0);
    // LED window still closed on schedule.
    assert_eq!(c.leds().lit(), FeedbackColor::Off);
}

#[test]
fn next_press_after_failed_release_watch_works_normally() {
    let mut c = controller(25.0);
    c.edge_watch_mut().fail_next = true;
    c.on_rising_edge(0);
    c.on_rising_edge(1_000);
    assert_eq!(c.state(), ButtonState::WatchingRelease);
    assert_eq!(c.long_press_deadline(), Some(19_000));
    assert_eq!(c.service_timers(19_000), 2);
    assert_eq!(submissions(&c), 1);
}

#[test]
fn failed_led_write_still_arms_timers_and_swaps_edge() {
    let mut c = ButtonGestureController::new(
        FakeEdges::default(),
        LedFeedbackDriver::new(FakeLeds {
            fail: true,
            ..Default::default()
        }),
        FakeProbe { reading: Ok(25.0) },
        FakeHandoff::default(),
    );
    c.start().unwrap();
    c.on_rising_edge(0);

    assert_eq!(led_ops(&c), [LedOp::Set(LedChannel::Green, 100)]);
    assert_eq!(c.state(), ButtonState::WatchingRelease);
    assert_eq!(c.edge_watch().armed.last(), Some(&Edge::Falling));
    assert_eq!(c.led_deadline(), Some(5_000));
    assert_eq!(c.long_press_deadline(), Some(18_000));

    // Off writes also fail; the window still closes and is not retried.
    assert_eq!(c.service_timers(5_000), 1);
    assert_eq!(c.led_deadline(), None);
    assert_eq!(c.service_timers(17_999), 0);
    assert_eq!(c.service_timers(18_000), 1);
    assert_eq!(submissions(&c), 1);
}

#[test]
fn failed_start_is_reported() {
    let mut c = ButtonGestureController::new(
        FakeEdges {
            fail_next: true,
            ..Default::default()
        },
        LedFeedbackDriver::new(FakeLeds::default()),
        FakeProbe { reading: Ok(25.0) },
        FakeHandoff::default(),
    );
    assert_eq!(c.start(), Err(Error::EdgeConfig));
    assert_eq!(c.state(), ButtonState::WatchingPress);
}

// ═══════════════════════════════════════════════════════════════════════════
// Timers
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn press_arms_both_timers() {
    let mut c = controller(25.0);
    c.on_rising_edge(1_234);
    assert_eq!(c.led_deadline(), Some(1_234 + 5_000));
    assert_eq!(c.long_press_deadline(), Some(1_234 + 18_000));
}

#[test]
fn led_window_restarts_from_latest_press() {
    let mut c = controller(25.0);
    c.on_rising_edge(0);
    c.on_falling_edge();
    c.on_rising_edge(3_000);
    c.on_falling_edge();

    assert_eq!(c.service_timers(5_000), 0);
    assert_eq!(c.leds().lit(), FeedbackColor::Green);
    assert_eq!(c.service_timers(8_000), 1);
    assert_eq!(c.leds().lit(), FeedbackColor::Off);
}

#[test]
fn led_expiry_is_unconditional_and_idempotent() {
    let mut c = controller(25.0);
    c.on_led_timer_expiry();
    c.on_led_timer_expiry();
    assert_eq!(
        led_ops(&c),
        [
            LedOp::Off(LedChannel::Green),
            LedOp::Off(LedChannel::Amber),
            LedOp::Off(LedChannel::Green),
            LedOp::Off(LedChannel::Amber),
        ]
    );
    assert_eq!(c.state(), ButtonState::WatchingPress);
}

#[test]
fn led_expiry_does_not_touch_long_press_timer() {
    let mut c = controller(25.0);
    c.on_rising_edge(0);
    c.service_timers(5_000);
    assert_eq!(c.led_deadline(), None);
    assert_eq!(c.long_press_deadline(), Some(18_000));
    assert_eq!(c.state(), ButtonState::WatchingRelease);
}

#[test]
fn release_cancels_long_press() {
    let mut c = controller(15.0);
    c.on_rising_edge(0);
    c.on_falling_edge();
    assert_eq!(c.long_press_deadline(), None);
    // LED window is left running.
    assert_eq!(c.led_deadline(), Some(5_000));
    c.service_timers(60_000);
    assert_eq!(submissions(&c), 0);
}

#[test]
fn release_at_17_9_s_never_shuts_down() {
    let mut c = controller(25.0);
    c.on_rising_edge(0);
    c.service_timers(17_900);
    c.on_falling_edge();
    c.service_timers(100_000);
    assert_eq!(submissions(&c), 0);
}

#[test]
fn hold_for_18_s_submits_exactly_once() {
    let mut c = controller(25.0);
    c.on_rising_edge(0);
    assert_eq!(c.service_timers(17_999), 1); // LED window only
    assert_eq!(submissions(&c), 0);
    assert_eq!(c.service_timers(18_000), 1);
    assert_eq!(submissions(&c), 1);
    assert_eq!(c.service_timers(120_000), 0);
    c.on_falling_edge();
    assert_eq!(submissions(&c), 1);
}

#[test]
fn release_observed_before_expiry_wins_tie() {
    let mut c = controller(25.0);
    c.on_rising_edge(0);
    c.service_timers(5_000);
    c.on_falling_edge(); // at 18_000, before the expiry runs
    assert_eq!(c.service_timers(18_000), 0);
    assert_eq!(submissions(&c), 0);
}

#[test]
fn long_press_expiry_after_release_is_not_retracted() {
    let mut c = controller(25.0);
    c.on_rising_edge(0);
    c.service_timers(18_000);
    c.on_falling_edge();
    assert_eq!(submissions(&c), 1);
}

#[test]
fn second_long_press_while_pending_is_benign() {
    let mut c = controller(25.0);
    c.on_rising_edge(0);
    c.service_timers(18_000);
    c.on_falling_edge();
    c.on_rising_edge(20_000);
    c.service_timers(38_000);
    assert_eq!(submissions(&c), 1);
    assert_eq!(c.long_press_deadline(), None);
}

#[test]
fn long_press_after_worker_drained_submits_again() {
    let mut c = controller(25.0);
    c.on_rising_edge(0);
    c.service_timers(18_000);
    c.on_falling_edge();

    // Worker consumed the request but the rail stayed up.
    c.handoff_mut().drain();

    c.on_rising_edge(30_000);
    c.service_timers(48_000);
    assert_eq!(submissions(&c), 2);
}

#[test]
fn service_timers_fires_in_deadline_order() {
    let mut c = controller(25.0);
    c.on_rising_edge(0);
    // Both due: LED (5 s) runs before long-press (18 s).
    assert_eq!(c.service_timers(30_000), 2);
    assert_eq!(c.leds().lit(), FeedbackColor::Off);
    assert_eq!(submissions(&c), 1);
}
