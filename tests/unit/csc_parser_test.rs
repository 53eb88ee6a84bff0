//! Unit tests for CSC Measurement parsing.

use rustcsc::sensors::csc::{
    parse_csc_measurement, required_len, CRANK_DATA_PRESENT, CSC_MEASUREMENT_UUID,
    CSC_SERVICE_UUID, WHEEL_DATA_PRESENT,
};
use rustcsc::sensors::{CrankReading, CscError, WheelReading};

#[test]
fn test_parse_combined_fields() {
    // Flags: 0x03
    // Wheel: 100 revs (LE32), 1024 (LE16)
    // Crank: 10 revs (LE16), 512 (LE16)
    let data = [
        0x03, 0x64, 0x00, 0x00, 0x00, 0x00, 0x04, 0x0A, 0x00, 0x00, 0x02,
    ];
    let result = parse_csc_measurement(&data).unwrap();

    assert_eq!(result.flags, 0x03);
    assert_eq!(
        result.wheel,
        Some(WheelReading {
            revolutions: 100,
            event_time: 1024
        })
    );
    assert_eq!(
        result.crank,
        Some(CrankReading {
            revolutions: 10,
            event_time: 512
        })
    );
}

#[test]
fn test_parse_wheel_only() {
    // Wheel: 0x01020304 revs, 0xFFFF
    let data = [0x01, 0x04, 0x03, 0x02, 0x01, 0xFF, 0xFF];
    let result = parse_csc_measurement(&data).unwrap();

    let wheel = result.wheel.unwrap();
    assert_eq!(wheel.revolutions, 0x0102_0304);
    assert_eq!(wheel.event_time, u16::MAX);
    assert!(result.crank.is_none());
}

#[test]
fn test_parse_no_fields() {
    let result = parse_csc_measurement(&[0x00]).unwrap();

    assert!(result.wheel.is_none());
    assert!(result.crank.is_none());
}

#[test]
fn test_wheel_flag_requires_seven_bytes() {
    let full = [0x01, 0x64, 0x00, 0x00, 0x00, 0x00, 0x04];
    for len in 1..full.len() {
        let result = parse_csc_measurement(&full[..len]);
        assert_eq!(
            result,
            Err(CscError::Format {
                required: 7,
                actual: len
            }),
            "length {len} should be rejected"
        );
    }
    assert!(parse_csc_measurement(&full).is_ok());
}

#[test]
fn test_wheel_flag_with_extra_bits_requires_seven_bytes() {
    // Reserved bits set alongside the wheel bit
    let data = [0xF1, 0x00, 0x00, 0x00];
    assert!(matches!(
        parse_csc_measurement(&data),
        Err(CscError::Format { required: 7, .. })
    ));
}

#[test]
fn test_crank_only_requires_five_bytes() {
    assert!(parse_csc_measurement(&[0x02, 0x0A, 0x00, 0x00]).is_err());
    assert!(parse_csc_measurement(&[0x02, 0x0A, 0x00, 0x00, 0x02]).is_ok());
}

#[test]
fn test_combined_requires_eleven_bytes() {
    let data = [0x03, 0x64, 0x00, 0x00, 0x00, 0x00, 0x04, 0x0A, 0x00, 0x00];
    assert_eq!(
        parse_csc_measurement(&data),
        Err(CscError::Format {
            required: 11,
            actual: 10
        })
    );
}

#[test]
fn test_trailing_bytes_ignored() {
    let data = [0x02, 0x0A, 0x00, 0x00, 0x02, 0xAA, 0xBB];
    let result = parse_csc_measurement(&data).unwrap();

    assert_eq!(result.crank.unwrap().revolutions, 10);
}

#[test]
fn test_flag_constants() {
    assert_eq!(required_len(WHEEL_DATA_PRESENT | CRANK_DATA_PRESENT), 11);
    assert_eq!(
        CSC_SERVICE_UUID.to_string(),
        "00001816-0000-1000-8000-00805f9b34fb"
    );
    assert_eq!(
        CSC_MEASUREMENT_UUID.to_string(),
        "00002a5b-0000-1000-8000-00805f9b34fb"
    );
}

#[test]
fn test_format_error_message() {
    let err = parse_csc_measurement(&[0x01]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Notification too short: flags require 7 bytes, got 1"
    );
}
