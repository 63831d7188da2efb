//! Application-wide constants and compile-time configuration.
//!
//! All network addresses, timing parameters, pin assignments and flash
//! layout live here so they can be tuned in one place. The connectivity
//! debounce/reconnect constants live next to their state machine in
//! `net::conn_logic`; the backlight defaults next to theirs in
//! `backlight_logic`.

// WiFi - station side

/// Password shared by all piste networks.
pub const WIFI_PASSWORD: &str = "01041967";

/// How often the connection task polls link state and evaluates
/// reconnects (ms). Must be well below the debounce window.
pub const LINK_POLL_MS: u64 = 250;

// WiFi - SoftAP side (companion network for auxiliary clients)

/// SoftAP SSID.
pub const SOFTAP_SSID: &str = "RemoteControl";

/// SoftAP password.
pub const SOFTAP_PASSWORD: &str = "01041967";

/// SoftAP address, on a different subnet than the station network so
/// the UDP target cannot collide with our own AP address.
pub const SOFTAP_IP: [u8; 4] = [192, 168, 5, 1];

/// SoftAP prefix length.
pub const SOFTAP_PREFIX_LEN: u8 = 24;

// UDP command transport

/// Peer controller address on the station network.
pub const UDP_TARGET_IP: &str = "192.168.4.1";

/// Peer controller port.
pub const UDP_TARGET_PORT: u16 = 1234;

/// Local port the command socket binds to.
pub const UDP_LOCAL_PORT: u16 = 1234;

// Backlight hardware
//
//   TFT backlight gate -> GPIO21, LEDC low-speed channel 0

/// LEDC PWM frequency (Hz). 2 kHz is comfortably above flicker for TFT
/// panels without stressing the gate driver.
pub const BACKLIGHT_PWM_HZ: u32 = 2000;

/// Cadence of the backlight inactivity tick (ms). Keeps timeout
/// overshoot under 50 ms.
pub const BACKLIGHT_TICK_MS: u64 = 50;

// Settings storage

/// Byte offset into flash where the settings region starts. Sits above
/// the application image on a standard 4 MB part.
pub const STORAGE_FLASH_OFFSET: u32 = 0x0031_0000;

/// Number of 4 KB flash sectors reserved for settings.
pub const STORAGE_FLASH_SECTOR_COUNT: u32 = 4;

// Task plumbing

/// Depth of the outbound command queue. Commands are point-in-time
/// operator input; a small queue is deliberate.
pub const COMMAND_QUEUE_DEPTH: usize = 8;
