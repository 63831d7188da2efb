//! Unified error type for piste-remote.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! There are no fatal runtime paths in this firmware: every variant is
//! handled by logging and carrying on. The panel must keep rendering
//! and accepting touch input regardless of network or storage trouble.

use defmt::Format;

/// Top-level error type used across the application.
#[derive(Debug, Format)]
pub enum Error {
    // Storage
    /// Flash read/write/erase failed.
    Storage,

    /// The settings region is full and could not be compacted.
    StorageFull,

    // Network
    /// The WiFi controller rejected a configuration or control call.
    Wifi,

    /// The UDP command socket could not be bound.
    SocketBind,
}
