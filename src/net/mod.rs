//! Networking subsystem - station/AP duplex WiFi and the UDP command
//! transport.
//!
//! 1. **Connection task** (`wifi`) - owns the WiFi controller, feeds
//!    link events into the debounced [`conn_logic::ConnectivityMonitor`]
//!    and publishes the single connectivity boolean in [`LINK_UP`].
//! 2. **Command task** (`udp`) - drains [`COMMAND_QUEUE`] and forwards
//!    operator commands to the peer controller through the gated
//!    [`transport::CommandTransport`].
//!
//! Link events arrive asynchronously from the WiFi stack; they are
//! consumed by the one connection task that owns the monitor, and every
//! other task only ever reads the published atomic. Communication with
//! the UI layer is done via the Embassy channels defined here.

pub mod conn_logic;
pub mod frame;
pub mod ident;
pub mod transport;
pub mod udp;
pub mod wifi;

use core::sync::atomic::AtomicBool;

use crate::config::COMMAND_QUEUE_DEPTH;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

/// Debounced connectivity signal.
///
/// Written only by the connection task; read by the command task (send
/// gating) and by the UI layer (screen selection).
pub static LINK_UP: AtomicBool = AtomicBool::new(false);

/// An outbound operator command from the UI layer.
#[derive(Clone, Debug)]
pub enum Command {
    /// A single 32-bit command word.
    Word(u32),
    /// An ordered batch of command words, sent as one frame.
    Batch(Vec<u32, { frame::MAX_BATCH_WORDS }>),
}

/// Queue of outbound commands, fed by the UI event handlers.
pub static COMMAND_QUEUE: Channel<CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH> =
    Channel::new();

/// Control messages for the connection task.
#[derive(Clone, Copy, Debug)]
pub enum NetCommand {
    /// Persist a new station number and rejoin that network.
    SetStation(u32),
}

/// Queue of control messages for the connection task.
pub static NET_COMMANDS: Channel<CriticalSectionRawMutex, NetCommand, 2> = Channel::new();
