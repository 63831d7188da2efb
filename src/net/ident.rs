//! Network identity - which piste network this panel joins.
//!
//! A panel is assigned a station number; the peer network it connects
//! to is named after that number (`Piste_001`, `Piste_002`, ...). The
//! formatted name is what gets persisted and handed to the WiFi stack.

use core::fmt::Write;

use heapless::String;

/// Station number used before any identity has been stored.
pub const DEFAULT_STATION: u32 = 1;

/// Format a station number as its network SSID, e.g. `Piste_001`.
pub fn station_ssid(station: u32) -> String<32> {
    let mut ssid: String<32> = String::new();
    // 32 bytes always fit "Piste_" plus a u32.
    let _ = write!(ssid, "Piste_{:03}", station);
    ssid
}

/// Recover the station number from a stored SSID, for display.
pub fn parse_station_ssid(ssid: &str) -> Option<u32> {
    ssid.strip_prefix("Piste_")?.parse().ok()
}
