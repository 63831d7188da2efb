//! Best-effort UDP command transport.
//!
//! Forwards point-in-time operator input to the peer controller:
//! at-most-once, fire-and-forget. There is no queuing, coalescing or
//! backpressure - a failed send means "this control input was dropped",
//! which is preferable to delivering it stale.
//!
//! Sends are gated on the connectivity signal and on the peer address
//! having been resolved. Resolution happens once, lazily, from the
//! configured textual address; a resolution failure permanently
//! disables sending until restart (the address is static configuration,
//! not discovered, so re-resolution would never yield anything new).
//!
//! "All bytes accepted by the socket" is the sole success criterion.
//! UDP gives no delivery guarantee; actual peer receipt is explicitly
//! not verified.

use core::net::Ipv4Addr;

use crate::net::frame;

/// Datagram transmit primitive the transport drives.
///
/// Implemented by the real UDP socket on the device and by recording
/// stubs in tests. Returns the number of bytes the socket accepted.
pub trait WordPort {
    fn transmit(&mut self, payload: &[u8], ip: Ipv4Addr, port: u16) -> usize;
}

/// Lazily-resolved peer address state.
enum PeerState {
    Unresolved,
    Resolved(Ipv4Addr),
    Failed,
}

/// Outbound command transport to a single configured peer.
pub struct CommandTransport {
    target: &'static str,
    port: u16,
    peer: PeerState,
}

impl CommandTransport {
    /// New transport for the given textual peer address and port.
    /// The address is not parsed until the first send.
    pub const fn new(target: &'static str, port: u16) -> Self {
        Self {
            target,
            port,
            peer: PeerState::Unresolved,
        }
    }

    /// True once peer address resolution has failed; sending stays
    /// disabled for the rest of the process lifetime.
    pub fn peer_failed(&self) -> bool {
        matches!(self.peer, PeerState::Failed)
    }

    /// Resolve the peer address on first use; sticky on failure.
    fn peer_addr(&mut self) -> Option<Ipv4Addr> {
        match self.peer {
            PeerState::Resolved(ip) => Some(ip),
            PeerState::Failed => None,
            PeerState::Unresolved => match self.target.parse::<Ipv4Addr>() {
                Ok(ip) => {
                    self.peer = PeerState::Resolved(ip);
                    Some(ip)
                }
                Err(_) => {
                    self.peer = PeerState::Failed;
                    None
                }
            },
        }
    }

    /// Send a single command word.
    ///
    /// Returns false with zero transmit calls when the link is down or
    /// the peer is unresolved; otherwise performs exactly one transmit
    /// and returns true iff all 4 bytes were accepted. No retry.
    pub fn send(&mut self, link_up: bool, word: u32, io: &mut impl WordPort) -> bool {
        if !link_up {
            return false;
        }
        let Some(ip) = self.peer_addr() else {
            return false;
        };

        let payload = frame::encode_word(word);
        io.transmit(&payload, ip, self.port) == payload.len()
    }

    /// Send a batch of command words as one contiguous frame.
    ///
    /// Same preconditions as [`send`](Self::send). The whole batch goes
    /// out in a single transmit call; a partial send counts as failure
    /// and is neither retried nor split.
    pub fn send_batch(&mut self, link_up: bool, words: &[u32], io: &mut impl WordPort) -> bool {
        if !link_up {
            return false;
        }
        let Some(ip) = self.peer_addr() else {
            return false;
        };

        let Some(payload) = frame::encode_batch(words) else {
            return false;
        };
        io.transmit(&payload, ip, self.port) == payload.len()
    }
}
