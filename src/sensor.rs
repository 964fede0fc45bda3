//! On-die temperature sensor.
//!
//! With the SoftDevice enabled the TEMP peripheral belongs to it, so
//! samples go through `sd_temp_get` instead of the HAL driver.

use crate::error::Error;
use crate::gesture::TemperatureProbe;
use nrf_softdevice::Softdevice;

/// SoftDevice-backed die temperature probe (0.25 °C resolution).
#[derive(Clone, Copy)]
pub struct DieTemperature {
    sd: &'static Softdevice,
}

impl DieTemperature {
    pub fn new(sd: &'static Softdevice) -> Self {
        Self { sd }
    }
}

impl TemperatureProbe for DieTemperature {
    fn read_celsius(&mut self) -> Result<f32, Error> {
        match nrf_softdevice::temperature_celsius(self.sd) {
            Ok(t) => Ok(t.to_num::<f32>()),
            Err(_) => {
                warn!("sd_temp_get failed");
                Err(Error::Sensor)
            }
        }
    }
}

/// Log whether the sensor answers at boot.  Not fatal either way.
pub fn probe_at_boot(sensor: &mut DieTemperature) {
    match sensor.read_celsius() {
        Ok(t) => info!("temp device ready, reading {}C", t),
        Err(_) => warn!("no temperature device"),
    }
}
