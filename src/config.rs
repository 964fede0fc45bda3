//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.  The colour
//! threshold and both timer windows are part of the observable contract
//! other components (and timing tests) rely on.

// Button gesture

/// Readings at or above this temperature light the green LED (°C).
pub const TEMP_MILD_CELSIUS: f32 = 20.0;

/// LED feedback window, restarted on every press (ms).
pub const LED_WINDOW_MS: u64 = 5_000;

/// Continuous hold that powers the device off (ms).
pub const LONG_PRESS_MS: u64 = 18_000;

// LED feedback

/// Brightness of the green LED for a "normal" reading (percent).
pub const GREEN_LED_PWM_PCT: u8 = 100;

/// Brightness of the amber LED for a "below threshold" reading (percent).
pub const AMBER_LED_PWM_PCT: u8 = 30;

/// PWM counter top; duty = `PWM_MAX_DUTY * percent / 100`.
pub const PWM_MAX_DUTY: u16 = 1_000;

// BLE

/// GAP device name, also placed in the scan response.
pub const DEVICE_NAME: &str = "tempsense";

/// Advertising interval in 0.625 ms units. 3200 = 2 s.
pub const BLE_ADV_INTERVAL: u32 = 3_200;

/// Health Thermometer measurement period while connected (seconds).
pub const HTS_PUBLISH_PERIOD_SECS: u64 = 1;

/// ATT MTU requested for the single peripheral link.
pub const BLE_ATT_MTU: u16 = 128;

// GPIO pin assignments
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button (active-high)  → P0.11
//   Green LED (PWM0 ch0)  → P0.13
//   Amber LED (PWM0 ch1)  → P0.14
//   Power kill (active-high) → P0.03
