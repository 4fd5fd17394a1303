//! Unit tests for the GATT data model

use super::constants::*;
use super::types::*;

#[test]
fn test_uuid_from_bytes() {
    // 16-bit UUID, little-endian
    assert_eq!(
        Uuid::from_bytes(&[0x0D, 0x18]),
        Some(Uuid::Uuid16(HEART_RATE_SERVICE_UUID))
    );

    // 128-bit UUID round-trips the raw bytes
    let raw: [u8; 16] = [
        0x9E, 0xCA, 0xDC, 0x24, 0x0E, 0xE5, 0xA9, 0xE0, 0x93, 0xF3, 0xA3, 0xB5, 0x01, 0x00, 0x40,
        0x6E,
    ];
    assert_eq!(Uuid::from_bytes(&raw), Some(Uuid::Uuid128(raw)));

    // Unsupported lengths
    assert_eq!(Uuid::from_bytes(&[0x01]), None);
    assert_eq!(Uuid::from_bytes(&[0x01, 0x02, 0x03, 0x04]), None);
}

#[test]
fn test_uuid_equality_is_type_and_value() {
    let short = Uuid::from_u16(0x180D);
    let mut expanded = [0u8; 16];
    expanded[12] = 0x0D;
    expanded[13] = 0x18;
    let long = Uuid::Uuid128(expanded);

    assert_eq!(short, Uuid::from_u16(0x180D));
    assert_ne!(short, Uuid::from_u16(0x180F));
    // A 16-bit UUID never equals its 128-bit expansion
    assert_ne!(short, long);
}

#[test]
fn test_uuid_display() {
    assert_eq!(Uuid::from_u16(0x2902).to_string(), "2902");

    let mut raw = [0u8; 16];
    raw[15] = 0x6E;
    raw[14] = 0x40;
    assert_eq!(
        Uuid::Uuid128(raw).to_string(),
        "6e400000-0000-0000-0000-000000000000"
    );
}

#[test]
fn test_handle_range() {
    let range = HandleRange::new(0x000A, 0x0014);
    assert!(!range.is_empty());
    assert!(range.contains(0x000A));
    assert!(range.contains(0x0014));
    assert!(!range.contains(0x0009));
    assert!(!range.contains(0x0015));

    // start > end means no handles at all
    assert!(HandleRange::new(0x0010, 0x000F).is_empty());
    // A single-handle range is valid
    assert!(!HandleRange::new(0x0010, 0x0010).is_empty());
}

#[test]
fn test_characteristic_properties() {
    let props = CharacteristicProperty::from_bits_truncate(0x12); // READ | NOTIFY
    assert!(props.can_read());
    assert!(props.can_notify());
    assert!(!props.can_write());
    assert!(!props.can_indicate());

    // Unknown high bits are dropped rather than rejected
    let all = CharacteristicProperty::from_bits_truncate(0xFF);
    assert!(all.can_write_without_response());
    assert!(all.can_indicate());
}
