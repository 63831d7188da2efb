//! UDP command task - drains the command queue toward the peer.
//!
//! Binds one socket on the station stack and forwards each queued
//! command through the gated [`CommandTransport`]. Failed sends are
//! logged and dropped; there is no retry and no backpressure toward
//! the UI layer beyond the small queue depth.

use core::net::Ipv4Addr;
use core::sync::atomic::Ordering;

use crate::config::{UDP_LOCAL_PORT, UDP_TARGET_IP, UDP_TARGET_PORT};
use crate::error::Error;
use crate::net::transport::{CommandTransport, WordPort};
use crate::net::{Command, COMMAND_QUEUE, LINK_UP};
use defmt::{debug, error, warn, Debug2Format};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;

/// Real datagram port over the embassy-net UDP socket.
///
/// `send_to` only suspends while the TX buffer is full; for this
/// fire-and-forget traffic it completes on the first poll, so driving
/// it to completion inline keeps the [`WordPort`] seam synchronous and
/// host-testable.
struct UdpWordPort<'a> {
    socket: UdpSocket<'a>,
}

impl WordPort for UdpWordPort<'_> {
    fn transmit(&mut self, payload: &[u8], ip: Ipv4Addr, port: u16) -> usize {
        match embassy_futures::block_on(self.socket.send_to(payload, (ip, port))) {
            Ok(()) => payload.len(),
            Err(e) => {
                debug!("udp: socket send error: {:?}", Debug2Format(&e));
                0
            }
        }
    }
}

fn bind(socket: &mut UdpSocket<'_>) -> Result<(), Error> {
    socket.bind(UDP_LOCAL_PORT).map_err(|e| {
        error!("udp: bind to port {} failed: {:?}", UDP_LOCAL_PORT, Debug2Format(&e));
        Error::SocketBind
    })
}

/// Forwards operator commands from [`COMMAND_QUEUE`] to the peer.
#[embassy_executor::task]
pub async fn command_task(sta_stack: Stack<'static>) -> ! {
    let mut rx_meta = [PacketMetadata::EMPTY; 4];
    let mut rx_buffer = [0u8; 256];
    let mut tx_meta = [PacketMetadata::EMPTY; 4];
    let mut tx_buffer = [0u8; 256];
    let mut socket = UdpSocket::new(
        sta_stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if bind(&mut socket).is_err() {
        // Degrade to a no-op sender; the panel stays responsive.
        loop {
            let _ = COMMAND_QUEUE.receive().await;
        }
    }

    let mut transport = CommandTransport::new(UDP_TARGET_IP, UDP_TARGET_PORT);
    let mut port = UdpWordPort { socket };
    let mut resolve_fault_logged = false;

    loop {
        let command = COMMAND_QUEUE.receive().await;
        let link_up = LINK_UP.load(Ordering::Relaxed);

        let sent = match &command {
            Command::Word(word) => {
                debug!("udp: sending {:#x} to {}:{}", *word, UDP_TARGET_IP, UDP_TARGET_PORT);
                transport.send(link_up, *word, &mut port)
            }
            Command::Batch(words) => {
                debug!("udp: sending {} words to {}:{}", words.len(), UDP_TARGET_IP, UDP_TARGET_PORT);
                transport.send_batch(link_up, words, &mut port)
            }
        };

        if !sent {
            if transport.peer_failed() {
                if !resolve_fault_logged {
                    error!("udp: invalid target address {}, sending disabled", UDP_TARGET_IP);
                    resolve_fault_logged = true;
                }
            } else if !link_up {
                debug!("udp: link down, command dropped");
            } else {
                warn!("udp: send failed, command dropped");
            }
        }
    }
}
