//! Unified error type for tempsense.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Sensor
    /// The on-die temperature sensor could not produce a sample.
    Sensor,

    // Feedback
    /// A PWM LED channel write failed.
    Led,

    // Power
    /// The power-kill output could not be driven.
    PowerKill,

    // Button
    /// The button edge interrupt could not be (re)configured.
    EdgeConfig,

    // BLE
    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// GATT server registration failed at startup.
    Register,
    /// Advertising could not start or was aborted.
    Advertise,
    /// A Temperature Measurement indication was rejected or busy.
    Indicate,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ble_errors_wrap_into_error() {
        assert_eq!(Error::from(BleError::Register), Error::Ble(BleError::Register));
        let e: Error = BleError::Indicate.into();
        assert_eq!(e, Error::Ble(BleError::Indicate));
        assert_ne!(e, Error::Ble(BleError::Advertise));
    }
}
