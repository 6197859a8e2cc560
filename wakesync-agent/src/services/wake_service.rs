use tokio::net::{UdpSocket, lookup_host};

use crate::configs::Wake;
use crate::errors::WakeError;
use crate::models::{MacAddress, MagicPacket, PACKET_LEN};

/// Builds magic packets and broadcasts them as single best-effort UDP
/// datagrams. At-most-once: no retry, no delivery confirmation.
pub struct WakeService {
    destination: String,
}

impl WakeService {
    pub fn new(settings: &Wake) -> Self {
        Self {
            destination: format!("{}:{}", settings.broadcast_addr, settings.port),
        }
    }

    /// Builds the magic packet for `mac` and broadcasts it. Returns the
    /// parsed address so callers can log the canonical form.
    pub async fn wake(&self, mac: &str) -> Result<MacAddress, WakeError> {
        let packet = MagicPacket::build(mac)?;
        self.send(&packet).await?;

        Ok(packet.target())
    }

    async fn send(&self, packet: &MagicPacket) -> Result<(), WakeError> {
        let target = lookup_host(self.destination.as_str())
            .await
            .ok()
            .and_then(|mut addresses| addresses.next())
            .ok_or_else(|| WakeError::Resolution(self.destination.clone()))?;

        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.set_broadcast(true)?;

        let bytes = packet.to_bytes();
        let written = socket.send_to(&bytes, target).await?;

        // A short accepted write is surfaced but does not fail the send.
        if written != PACKET_LEN {
            tracing::warn!("unexpected bytes written: {} of {}", written, PACKET_LEN);
        }

        Ok(())
    }
}
