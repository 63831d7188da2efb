//! Connectivity state machine for the station link.
//!
//! Two states, `Disconnected` and `Connected`. Connecting is honored
//! immediately (an address assignment is hard evidence the link works),
//! while disconnect events are debounced: a drop is only accepted once
//! the current state has been stable for [`DEBOUNCE_WINDOW_MS`]. This
//! absorbs transient radio flaps that would otherwise toggle the UI and
//! drop commands for no reason.
//!
//! Reconnect attempts are rate-limited to one per
//! [`RECONNECT_INTERVAL_MS`] so a dead access point cannot cause a
//! retry storm.
//!
//! All methods take the current wall-clock time in milliseconds so the
//! machine is a pure function of its inputs and can be tested on the
//! host without a clock.

/// Minimum time the link state must persist before a disconnect event
/// is honored.
pub const DEBOUNCE_WINDOW_MS: u64 = 3000;

/// Minimum spacing between reconnect attempts while disconnected.
pub const RECONNECT_INTERVAL_MS: u64 = 5000;

/// Result of a periodic connectivity poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkCheck {
    /// Current debounced connectivity signal.
    pub connected: bool,
    /// True when a reconnect attempt should be issued on this poll.
    /// At most one poll per [`RECONNECT_INTERVAL_MS`] reports this.
    pub reconnect_due: bool,
}

/// Debounced station-link connectivity monitor.
///
/// Owned by the WiFi connection task; link events and polls must come
/// from that single owner. The derived boolean signal is published to
/// other tasks separately (see `net::LINK_UP`).
pub struct ConnectivityMonitor {
    connected: bool,
    last_state_change_ms: u64,
    last_reconnect_attempt_ms: u64,
}

impl ConnectivityMonitor {
    /// New monitor, initially disconnected.
    pub const fn new() -> Self {
        Self {
            connected: false,
            last_state_change_ms: 0,
            last_reconnect_attempt_ms: 0,
        }
    }

    /// Current debounced connectivity signal.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The station interface got an IP address.
    ///
    /// Transitions to `Connected` immediately; no debounce in this
    /// direction. Re-observing an address while already connected is a
    /// no-op so that periodic "config up" checks cannot keep resetting
    /// the state-change clock and starve the disconnect debounce.
    ///
    /// Returns true on the actual `Disconnected` -> `Connected` edge.
    pub fn on_address_acquired(&mut self, now_ms: u64) -> bool {
        if self.connected {
            return false;
        }
        self.connected = true;
        self.last_state_change_ms = now_ms;
        true
    }

    /// The station link dropped.
    ///
    /// Accepted only if currently connected and the state has been
    /// stable for at least [`DEBOUNCE_WINDOW_MS`]; otherwise the event
    /// is absorbed. Duplicate drops while disconnected are no-ops.
    ///
    /// Returns true if the drop was accepted.
    pub fn on_link_dropped(&mut self, now_ms: u64) -> bool {
        if !self.connected {
            return false;
        }
        if now_ms.saturating_sub(self.last_state_change_ms) < DEBOUNCE_WINDOW_MS {
            return false;
        }
        self.connected = false;
        self.last_state_change_ms = now_ms;
        true
    }

    /// Periodic poll.
    ///
    /// Fast path when connected. When disconnected, reports at most one
    /// `reconnect_due` per [`RECONNECT_INTERVAL_MS`]; the attempt
    /// timestamp is recorded here regardless of what the caller does
    /// with it, so retries stay bounded even if the caller skips the
    /// actual connect call.
    pub fn check_connection(&mut self, now_ms: u64) -> LinkCheck {
        if self.connected {
            return LinkCheck {
                connected: true,
                reconnect_due: false,
            };
        }

        let due =
            now_ms.saturating_sub(self.last_reconnect_attempt_ms) >= RECONNECT_INTERVAL_MS;
        if due {
            self.last_reconnect_attempt_ms = now_ms;
        }

        LinkCheck {
            connected: false,
            reconnect_due: due,
        }
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}
