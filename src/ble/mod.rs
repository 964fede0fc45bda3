//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Advertiser** - connectable, scannable advertising every 2 s with
//!    the Health Thermometer and Device Information UUIDs and the device
//!    name in the scan response.  Restarts after every disconnect.
//! 2. **GATT server** - Health Thermometer service publishing the die
//!    temperature as 5-byte Temperature Measurement indications.
//!
//! The button gesture path never touches BLE; both only share the
//! SoftDevice-backed temperature sensor.

pub mod adv;
pub mod htm;
pub mod server;

use crate::config::{BLE_ADV_INTERVAL, BLE_ATT_MTU, DEVICE_NAME};
use crate::error::{BleError, Error};
use crate::sensor::DieTemperature;
use embassy_time::Timer;
use nrf_softdevice::ble::{peripheral, Connection};
use nrf_softdevice::{raw, Softdevice};
use server::Server;

/// SoftDevice configuration: one peripheral link, device name on the stack.
pub fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t {
            att_mtu: BLE_ATT_MTU,
        }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            // SAFETY: all-zero is "no write access", a valid permission set.
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Run the SoftDevice event loop - must be spawned before any BLE call.
#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

async fn advertise(
    sd: &'static Softdevice,
    adv_data: &[u8],
    scan_data: &[u8],
    config: &peripheral::Config,
) -> Result<Connection, Error> {
    let advertisement =
        peripheral::ConnectableAdvertisement::ScannableUndirected { adv_data, scan_data };
    peripheral::advertise_connectable(sd, advertisement, config)
        .await
        .map_err(|e| {
            warn!("advertise_connectable: {:?}", e);
            BleError::Advertise.into()
        })
}

/// Advertise, serve one central, repeat.
#[embassy_executor::task]
pub async fn peripheral_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    let adv_data = adv::advertisement_data();
    let scan_data = adv::scan_response_data(DEVICE_NAME);
    let config = peripheral::Config {
        interval: BLE_ADV_INTERVAL,
        ..Default::default()
    };

    loop {
        info!("Advertising as \"{}\"", DEVICE_NAME);
        let conn = match advertise(sd, &adv_data, &scan_data, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Advertising failed to start: {:?}", e);
                Timer::after_secs(1).await;
                continue;
            }
        };

        let peer = conn.peer_address();
        info!("Connected to {:?}", peer);
        let reason = server::serve(&conn, server, DieTemperature::new(sd)).await;
        info!("Disconnected from {:?} ({:?})", peer, reason);
    }
}
