//! GATT server - Health Thermometer + Device Information.
//!
//! While a central is connected, the die temperature is sampled once per
//! second and sent as a Temperature Measurement indication, but only
//! after the central has enabled indications on the CCCD.  A rejected
//! or still-in-flight indication just skips that sample.

use core::cell::Cell;

use crate::ble::htm::{HtmRecord, HTM_RECORD_SIZE};
use crate::config::{DEVICE_NAME, HTS_PUBLISH_PERIOD_SECS};
use crate::error::{BleError, Error};
use crate::gesture::TemperatureProbe;
use crate::sensor::DieTemperature;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use heapless::String;
use nrf_softdevice::ble::{gatt_server, Connection, DisconnectedError};
use nrf_softdevice::Softdevice;

// Health Thermometer (0x1809)
#[nrf_softdevice::gatt_service(uuid = "1809")]
pub struct HealthThermometerService {
    // Temperature Measurement: flags, 24-bit mantissa, exponent.
    #[characteristic(uuid = "2a1c", indicate)]
    pub measurement: [u8; HTM_RECORD_SIZE],
}

// Device Information (0x180A)
#[nrf_softdevice::gatt_service(uuid = "180a")]
pub struct DeviceInformationService {
    #[characteristic(uuid = "2a29", read)]
    pub manufacturer_name: String<32>,

    #[characteristic(uuid = "2a24", read)]
    pub model_number: String<32>,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub hts: HealthThermometerService,
    pub dis: DeviceInformationService,
}

/// Register both services with the SoftDevice.
pub fn register(sd: &mut Softdevice) -> Result<Server, Error> {
    Server::new(sd).map_err(|e| {
        error!("GATT server registration failed: {:?}", e);
        BleError::Register.into()
    })
}

/// Fill in the static Device Information values.  Failure only loses
/// the strings, not the service.
pub fn init_device_information(server: &Server) {
    let mut manufacturer: String<32> = String::new();
    let _ = manufacturer.push_str("tempsense contributors");
    let mut model: String<32> = String::new();
    let _ = model.push_str(DEVICE_NAME);

    if server.dis.manufacturer_name_set(&manufacturer).is_err()
        || server.dis.model_number_set(&model).is_err()
    {
        warn!("Could not set Device Information values");
    }
}

/// Serve one connection until it drops.
pub async fn serve(
    conn: &Connection,
    server: &Server,
    mut sensor: DieTemperature,
) -> DisconnectedError {
    let indications = Cell::new(false);

    let gatt = gatt_server::run(conn, server, |event| match event {
        ServerEvent::Hts(HealthThermometerServiceEvent::MeasurementCccdWrite {
            indications: enabled,
        }) => {
            info!("HTM indications enabled={}", enabled);
            indications.set(enabled);
        }
        _ => {}
    });
    let publisher = publish_measurements(conn, server, &mut sensor, &indications);

    match select(gatt, publisher).await {
        Either::First(disconnected) => disconnected,
        Either::Second(never) => never,
    }
}

fn indicate(conn: &Connection, server: &Server, record: &HtmRecord) -> Result<(), Error> {
    server
        .hts
        .measurement_indicate(conn, &record.to_bytes())
        .map_err(|e| {
            debug!("measurement_indicate: {:?}", e);
            BleError::Indicate.into()
        })
}

async fn publish_measurements(
    conn: &Connection,
    server: &Server,
    sensor: &mut DieTemperature,
    indications: &Cell<bool>,
) -> ! {
    let mut ticker = Ticker::every(Duration::from_secs(HTS_PUBLISH_PERIOD_SECS));

    loop {
        ticker.next().await;

        let temperature = match sensor.read_celsius() {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping measurement: {:?}", e);
                continue;
            }
        };
        debug!("temperature is {}C", temperature);

        if !indications.get() {
            continue;
        }

        match indicate(conn, server, &HtmRecord::celsius(temperature)) {
            Ok(()) => debug!("Indication sent"),
            Err(e) => warn!("Indication failed: {:?}", e),
        }
    }
}
