//! GATT protocol constants

// ATT handle values
pub const ATT_HANDLE_MIN: u16 = 0x0001;
pub const ATT_HANDLE_MAX: u16 = 0xFFFF;

/// Sentinel for "no handle": 0x0000 is outside the valid ATT handle range.
pub const INVALID_HANDLE: u16 = 0x0000;

// Declaration attribute type UUIDs
pub const PRIMARY_SERVICE_UUID: u16 = 0x2800;
pub const SECONDARY_SERVICE_UUID: u16 = 0x2801;
pub const INCLUDE_UUID: u16 = 0x2802;
pub const CHARACTERISTIC_UUID: u16 = 0x2803;

// Descriptor UUIDs
pub const CHAR_EXTENDED_PROPS_UUID: u16 = 0x2900;
pub const CHAR_USER_DESC_UUID: u16 = 0x2901;
pub const CLIENT_CHAR_CONFIG_UUID: u16 = 0x2902;
pub const SERVER_CHAR_CONFIG_UUID: u16 = 0x2903;
pub const CHAR_FORMAT_UUID: u16 = 0x2904;

// Well-known 16-bit service UUIDs central-role consumers register for
pub const DEVICE_INFORMATION_SERVICE_UUID: u16 = 0x180A;
pub const HEART_RATE_SERVICE_UUID: u16 = 0x180D;
pub const BATTERY_SERVICE_UUID: u16 = 0x180F;
pub const BLOOD_PRESSURE_SERVICE_UUID: u16 = 0x1810;
