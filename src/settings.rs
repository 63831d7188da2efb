//! On-flash record layout for persisted settings.
//!
//! The flash map stores byte-slice values under single-byte keys; this
//! module is the pure codec between those slices and the typed
//! settings. Decoders are tolerant: short or garbage records decode to
//! `None` and the caller falls back to compiled defaults.

use crate::backlight_logic::BacklightConfig;

/// Map key for the backlight configuration record.
pub const KEY_BACKLIGHT: u8 = 0x01;

/// Map key for the persisted station network name.
pub const KEY_STATION_SSID: u8 = 0x02;

/// Encoded size of a backlight configuration record.
pub const BACKLIGHT_RECORD_LEN: usize = 6;

/// Encode: `[default][idle][timeout_ms as u32 LE]`.
pub fn encode_backlight(config: &BacklightConfig) -> [u8; BACKLIGHT_RECORD_LEN] {
    let t = config.timeout_ms.to_le_bytes();
    [
        config.default_brightness,
        config.idle_brightness,
        t[0],
        t[1],
        t[2],
        t[3],
    ]
}

/// Decode a backlight configuration record. Extra trailing bytes are
/// ignored; short records are rejected.
pub fn decode_backlight(data: &[u8]) -> Option<BacklightConfig> {
    if data.len() < BACKLIGHT_RECORD_LEN {
        return None;
    }
    Some(BacklightConfig {
        default_brightness: data[0],
        idle_brightness: data[1],
        timeout_ms: u32::from_le_bytes([data[2], data[3], data[4], data[5]]),
    })
}
