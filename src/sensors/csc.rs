//! CSC (Cycling Speed and Cadence) measurement parsing.
//!
//! Decodes CSC Measurement (0x2A5B) notifications into cumulative wheel and
//! crank revolution data.

use crate::sensors::types::{CrankReading, CscError, CscMeasurement, WheelReading};
use uuid::Uuid;

/// Cycling Speed and Cadence Service UUID (0x1816)
pub const CSC_SERVICE_UUID: Uuid = Uuid::from_u128(0x0000_1816_0000_1000_8000_0080_5f9b_34fb);

/// CSC Measurement Characteristic UUID (0x2A5B)
pub const CSC_MEASUREMENT_UUID: Uuid = Uuid::from_u128(0x0000_2a5b_0000_1000_8000_0080_5f9b_34fb);

/// Wheel revolution data present (bit 0)
pub const WHEEL_DATA_PRESENT: u8 = 0x01;

/// Crank revolution data present (bit 1)
pub const CRANK_DATA_PRESENT: u8 = 0x02;

/// Size of the wheel field group (u32 revolutions + u16 event time)
const WHEEL_FIELDS_LEN: usize = 6;

/// Size of the crank field group (u16 revolutions + u16 event time)
const CRANK_FIELDS_LEN: usize = 4;

/// Number of bytes a notification with the given flags must carry.
pub fn required_len(flags: u8) -> usize {
    let mut len = 1;
    if flags & WHEEL_DATA_PRESENT != 0 {
        len += WHEEL_FIELDS_LEN;
    }
    if flags & CRANK_DATA_PRESENT != 0 {
        len += CRANK_FIELDS_LEN;
    }
    len
}

/// Parse a CSC Measurement notification.
///
/// The data format is:
/// - Byte 0: Flags
/// - Wheel data (if bit 0): u32 cumulative revolutions, u16 last event time
/// - Crank data (if bit 1): u16 cumulative revolutions, u16 last event time
///
/// All fields are little-endian. Crank fields follow the wheel fields when
/// both are present. Bytes past the flagged fields are ignored.
pub fn parse_csc_measurement(data: &[u8]) -> Result<CscMeasurement, CscError> {
    let Some(&flags) = data.first() else {
        return Err(CscError::Format {
            required: 1,
            actual: 0,
        });
    };

    let required = required_len(flags);
    if data.len() < required {
        return Err(CscError::Format {
            required,
            actual: data.len(),
        });
    }

    let mut result = CscMeasurement {
        flags,
        ..Default::default()
    };
    let mut offset = 1usize;

    if flags & WHEEL_DATA_PRESENT != 0 {
        let revolutions = u32::from_le_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        offset += 4;
        let event_time = u16::from_le_bytes([data[offset], data[offset + 1]]);
        offset += 2;

        result.wheel = Some(WheelReading {
            revolutions,
            event_time,
        });
    }

    if flags & CRANK_DATA_PRESENT != 0 {
        let revolutions = u16::from_le_bytes([data[offset], data[offset + 1]]);
        offset += 2;
        let event_time = u16::from_le_bytes([data[offset], data[offset + 1]]);

        result.crank = Some(CrankReading {
            revolutions,
            event_time,
        });
    }

    tracing::trace!(flags, wheel = ?result.wheel, crank = ?result.crank, "Parsed CSC measurement");

    Ok(result)
}
