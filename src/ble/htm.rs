//! Health Thermometer "Temperature Measurement" record (0x2A1C).
//!
//! Layout (5 bytes, no timestamp / type fields):
//! ```text
//! Byte 0:   Flags        bit 0 = 0 Celsius, 1 Fahrenheit
//! Byte 1-3: Mantissa     24-bit signed, little-endian
//! Byte 4:   Exponent     8-bit signed (base 10)
//! ```
//! The mantissa/exponent pair is an IEEE-11073 32-bit FLOAT.  We always
//! publish hundredths of a degree Celsius: `round(t × 100)`, exponent -2.

/// Encoded record size in bytes.
pub const HTM_RECORD_SIZE: usize = 5;

/// Flags bit 0: temperature is in Fahrenheit.
pub const FLAG_FAHRENHEIT: u8 = 0x01;

/// Exponent used for published readings.
pub const HTM_EXPONENT: i8 = -2;

/// Reserved FLOAT mantissa meaning "not a number".
pub const MANTISSA_NAN: i32 = 0x007F_FFFF;

/// Largest finite mantissa (values above are reserved specials).
const MANTISSA_MAX: i32 = 0x007F_FFFD;
const MANTISSA_MIN: i32 = -MANTISSA_MAX;

/// A single Temperature Measurement value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HtmRecord {
    pub flags: u8,
    /// 24-bit signed mantissa (stored sign-extended).
    pub mantissa: i32,
    pub exponent: i8,
}

impl HtmRecord {
    /// Encode a Celsius reading with two decimal places.
    ///
    /// Out-of-range values saturate; NaN maps to the reserved NaN value.
    pub fn celsius(temperature: f32) -> Self {
        if temperature.is_nan() {
            return Self {
                flags: 0,
                mantissa: MANTISSA_NAN,
                exponent: 0,
            };
        }

        let scaled = temperature * 100.0;
        // Round half away from zero; `as` saturates at the i32 limits.
        let rounded = if scaled >= 0.0 {
            (scaled + 0.5) as i32
        } else {
            (scaled - 0.5) as i32
        };

        Self {
            flags: 0,
            mantissa: rounded.clamp(MANTISSA_MIN, MANTISSA_MAX),
            exponent: HTM_EXPONENT,
        }
    }

    pub fn is_fahrenheit(&self) -> bool {
        self.flags & FLAG_FAHRENHEIT != 0
    }

    /// Wire bytes for the indication payload.
    pub fn to_bytes(&self) -> [u8; HTM_RECORD_SIZE] {
        let m = self.mantissa.to_le_bytes();
        [self.flags, m[0], m[1], m[2], self.exponent as u8]
    }

    /// Serialise into a byte slice.
    /// Returns the number of bytes written (0 if `buf` is too small).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < HTM_RECORD_SIZE {
            return 0;
        }
        buf[..HTM_RECORD_SIZE].copy_from_slice(&self.to_bytes());
        HTM_RECORD_SIZE
    }

    /// Parse the first five bytes of `data`.  Extra bytes are ignored.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < HTM_RECORD_SIZE {
            return None;
        }
        // Sign-extend the 24-bit mantissa through the top byte.
        let mantissa = i32::from_le_bytes([data[1], data[2], data[3], 0]) << 8 >> 8;
        Some(Self {
            flags: data[0],
            mantissa,
            exponent: data[4] as i8,
        })
    }

    /// Decoded value in the record's unit.
    pub fn value(&self) -> f32 {
        if self.mantissa == MANTISSA_NAN {
            return f32::NAN;
        }
        let mut v = self.mantissa as f32;
        let mut exp = self.exponent;
        while exp > 0 {
            v *= 10.0;
            exp -= 1;
        }
        while exp < 0 {
            v /= 10.0;
            exp += 1;
        }
        v
    }
}
