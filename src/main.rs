//! tempsense - wearable temperature sensor firmware for nRF52840.
//!
//! Boot order:
//! 1. SoftDevice up (it owns the TEMP peripheral), GATT server registered
//! 2. Both feedback LEDs forced off
//! 3. Temperature sensor probed
//! 4. Button armed for the first press
//! 5. Tasks spawned: SoftDevice, shutdown worker, gesture, BLE peripheral
//!
//! A component that fails to come up is logged and left out; the rest of
//! the firmware keeps running.

#![no_std]
#![no_main]

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

mod ble;
mod button;
mod config;
mod error;
mod gesture;
mod led;
mod led_logic;
mod power;
mod power_logic;
mod sensor;

use defmt_rtt as _;
use panic_probe as _;

use ble::server::{init_device_information, Server};
use button::{gesture_task, ButtonPin};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::interrupt::Priority;
use embassy_nrf::pwm::SimplePwm;
use gesture::ButtonGestureController;
use led::PwmLeds;
use led_logic::LedFeedbackDriver;
use nrf_softdevice::Softdevice;
use power::{shutdown_receiver, shutdown_sender, shutdown_worker, KillPin};
use power_logic::PowerController;
use sensor::DieTemperature;
use static_cell::StaticCell;

static SERVER: StaticCell<Server> = StaticCell::new();

/// Keep HAL interrupts off the SoftDevice-reserved priority levels.
fn hal_config() -> embassy_nrf::config::Config {
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    config
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("tempsense starting");
    let p = embassy_nrf::init(hal_config());

    // - BLE stack -----------------------------------------
    let sd = Softdevice::enable(&ble::softdevice_config());
    let server: Option<&'static Server> = match ble::server::register(sd) {
        Ok(server) => {
            let server = SERVER.init(server);
            init_device_information(server);
            Some(&*server)
        }
        Err(e) => {
            error!("BLE publisher unavailable: {:?}", e);
            None
        }
    };
    let sd: &'static Softdevice = sd;
    if let Err(e) = spawner.spawn(ble::softdevice_task(sd)) {
        error!("SoftDevice task spawn failed: {:?}", e);
    }

    // - Feedback LEDs -------------------------------------
    let pwm = SimplePwm::new_2ch(p.PWM0, p.P0_13, p.P0_14);
    let mut leds = LedFeedbackDriver::new(PwmLeds::new(pwm));
    leds.all_off();

    // - Temperature sensor --------------------------------
    let mut sensor = DieTemperature::new(sd);
    sensor::probe_at_boot(&mut sensor);

    // - Power kill ----------------------------------------
    let kill = KillPin::new(Output::new(p.P0_03, Level::Low, OutputDrive::Standard));
    if let Err(e) = spawner.spawn(shutdown_worker(PowerController::new(kill), shutdown_receiver())) {
        error!("Shutdown worker spawn failed: {:?}", e);
    }

    // - Button --------------------------------------------
    let button = ButtonPin::new(Input::new(p.P0_11, Pull::Down));
    let mut controller = ButtonGestureController::new(button, leds, sensor, shutdown_sender());
    match controller.start() {
        Ok(()) => {
            if let Err(e) = spawner.spawn(gesture_task(controller)) {
                error!("Gesture task spawn failed: {:?}", e);
            }
        }
        Err(e) => warn!("Button unavailable, gestures disabled: {:?}", e),
    }

    // - BLE publisher -------------------------------------
    match server {
        Some(server) => {
            if let Err(e) = spawner.spawn(ble::peripheral_task(sd, server)) {
                error!("BLE peripheral task spawn failed: {:?}", e);
            }
        }
        None => warn!("BLE publisher disabled"),
    }

    info!("Initialization complete");
}
