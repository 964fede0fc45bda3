//! Legacy advertising payloads.
//!
//! Advertising data carries the flags and the 16-bit service list
//! (Health Thermometer + Device Information); the device name goes in the
//! scan response.  Each payload is at most 31 bytes.

use heapless::Vec;

/// Maximum legacy advertising / scan response payload.
pub const ADV_PAYLOAD_MAX: usize = 31;

pub type AdvPayload = Vec<u8, ADV_PAYLOAD_MAX>;

const AD_TYPE_FLAGS: u8 = 0x01;
const AD_TYPE_UUID16_COMPLETE: u8 = 0x03;
const AD_TYPE_SHORTENED_NAME: u8 = 0x08;
const AD_TYPE_COMPLETE_NAME: u8 = 0x09;

/// LE General Discoverable, BR/EDR not supported.
pub const FLAGS_GENERAL_NO_BREDR: u8 = 0x06;

/// Health Thermometer service.
pub const UUID_HEALTH_THERMOMETER: u16 = 0x1809;
/// Device Information service.
pub const UUID_DEVICE_INFORMATION: u16 = 0x180A;

/// Advertising data: flags + complete 16-bit UUID list.
pub fn advertisement_data() -> AdvPayload {
    let mut payload = AdvPayload::new();
    let _ = payload.extend_from_slice(&[2, AD_TYPE_FLAGS, FLAGS_GENERAL_NO_BREDR]);

    let uuids = [UUID_HEALTH_THERMOMETER, UUID_DEVICE_INFORMATION];
    let _ = payload.push(1 + 2 * uuids.len() as u8);
    let _ = payload.push(AD_TYPE_UUID16_COMPLETE);
    for uuid in uuids {
        let _ = payload.extend_from_slice(&uuid.to_le_bytes());
    }
    payload
}

/// Scan response: complete local name, or shortened if it does not fit.
pub fn scan_response_data(name: &str) -> AdvPayload {
    let mut payload = AdvPayload::new();
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return payload;
    }

    let room = ADV_PAYLOAD_MAX - 2;
    let (ad_type, bytes) = if bytes.len() <= room {
        (AD_TYPE_COMPLETE_NAME, bytes)
    } else {
        (AD_TYPE_SHORTENED_NAME, &bytes[..room])
    };

    let _ = payload.push(1 + bytes.len() as u8);
    let _ = payload.push(ad_type);
    let _ = payload.extend_from_slice(bytes);
    payload
}
