//! Test-only library interface for tempsense.
//!
//! This module re-exports the pure logic modules that can be tested
//! on the host (no embedded hardware required): the button gesture
//! state machine, LED feedback policy, power-off controller and the
//! BLE payload encoders.
//!
//! Usage: `cargo test --lib` (unit) or `cargo test` (unit + tests/).
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].
//! This lib.rs provides a separate entry point for host-based testing.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod gesture;
pub mod led_logic;
pub mod power_logic;

// Internal module paths for the actual implementations.  `ble/mod.rs`
// itself needs the SoftDevice, so only its pure children are pulled in.
#[path = "ble/adv.rs"]
mod ble_adv_impl;
#[path = "ble/htm.rs"]
mod ble_htm_impl;

pub mod ble {
    pub mod adv {
        pub use crate::ble_adv_impl::*;
    }
    pub mod htm {
        pub use crate::ble_htm_impl::*;
    }
}
