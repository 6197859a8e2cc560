use std::sync::Arc;
use std::time::Duration;

use rand::seq::IndexedRandom;
use serde_json::json;
use tokio::time;

use crate::broker::MockBroker;
use crate::settings::Settings;

mod broker;
pub mod settings;

/// Runs an embedded broker and publishes a wake command for a random
/// configured hardware address every interval, until interrupted.
pub async fn run(settings: &Arc<Settings>) {
    let broker = MockBroker::new(&settings.broker).expect("Fail to create broker");
    let mut link_tx = broker.link(&settings.broker.topic);
    broker.start();

    tracing::info!(
        "mock broker on {}:{}, publishing to {}",
        settings.broker.host,
        settings.broker.port,
        settings.broker.topic
    );

    let mut interval = time::interval(Duration::from_secs(settings.mock.interval));
    loop {
        interval.tick().await;

        let mac = {
            let mut rng = rand::rng();
            settings.mock.macs.choose(&mut rng).cloned()
        };
        let Some(mac) = mac else {
            tracing::warn!("no mock addresses configured");
            continue;
        };

        let command = json!({ "mac": mac });

        tracing::debug!("Send: {}", &command);

        match serde_json::to_vec(&command) {
            Ok(payload) => {
                if let Err(e) = link_tx.publish(settings.broker.topic.clone(), payload) {
                    tracing::error!("publish failed: {}", e);
                }
            }
            Err(e) => tracing::error!("serialize failed: {}", e),
        }
    }
}
