use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::oneshot;
use tokio::time;

use crate::configs::Broker;
use crate::errors::CommandError;
use crate::models::{MacAddress, WakeCommand};
use crate::services::WakeService;

const CHANNEL_CAPACITY: usize = 10;
const KEEP_ALIVE: Duration = Duration::from_secs(30);
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Consumes wake commands from the broker and dispatches them to the
/// wake service.
pub struct CommandService {
    client: AsyncClient,
    event_loop: EventLoop,
    topic: String,
    wake_service: Arc<WakeService>,
}

impl CommandService {
    pub fn new(settings: &Broker, wake_service: Arc<WakeService>) -> Self {
        let mut options =
            MqttOptions::new(settings.client_id.clone(), settings.host.clone(), settings.port);
        options.set_keep_alive(KEEP_ALIVE);

        if let Some(auth) = &settings.auth {
            options.set_credentials(auth.username.clone(), auth.password.clone());
        }

        let (client, event_loop) = AsyncClient::new(options, CHANNEL_CAPACITY);

        Self {
            client,
            event_loop,
            topic: settings.topic.clone(),
            wake_service,
        }
    }

    /// Drives the broker event loop until the stop signal fires. The
    /// subscription is re-established on every ConnAck, so it survives
    /// reconnects; a failed message never stops consumption.
    pub async fn run(mut self, mut stop_rx: oneshot::Receiver<()>) {
        loop {
            tokio::select! {
                _ = &mut stop_rx => {
                    let _ = self.client.disconnect().await;
                    break;
                }
                event = self.event_loop.poll() => match event {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        tracing::info!("connected to broker");
                        Self::subscribe(&self.client, &self.topic).await;
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        match handle_payload(&self.wake_service, &publish.payload).await {
                            Ok(mac) => tracing::info!("magic packet sent to {}", mac),
                            Err(e) => tracing::error!("dropping message: {}", e),
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("broker connection lost: {}", e);
                        time::sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        }
    }

    async fn subscribe(client: &AsyncClient, topic: &str) {
        match client.subscribe(topic, QoS::AtMostOnce).await {
            Ok(()) => tracing::info!("subscribed to {}", topic),
            Err(e) => tracing::error!("subscribe failed: {}", e),
        }
    }
}

/// Decodes one inbound payload, normalizes the target address and hands
/// it to the wake service. Holds no state between invocations.
pub async fn handle_payload(
    wake_service: &WakeService,
    payload: &[u8],
) -> Result<MacAddress, CommandError> {
    let command: WakeCommand = serde_json::from_slice(payload)?;
    let mac = command.normalized_mac();

    tracing::info!("received wake request for {}", mac);

    Ok(wake_service.wake(&mac).await?)
}
