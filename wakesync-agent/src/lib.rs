use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::oneshot;
use tokio::time;

use crate::configs::Settings;
use crate::services::{CommandService, WakeService};

pub mod configs;
pub mod errors;
pub mod models;
pub mod services;

/// Grace period for a send already in flight when shutdown is requested.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

pub async fn run(settings: &Arc<Settings>) {
    let wake_service = Arc::new(WakeService::new(&settings.wake));
    let command_service = CommandService::new(&settings.broker, Arc::clone(&wake_service));

    tracing::info!(
        "bridging {} on {}:{} to {}:{}",
        settings.broker.topic,
        settings.broker.host,
        settings.broker.port,
        settings.wake.broadcast_addr,
        settings.wake.port
    );

    let (stop_tx, stop_rx) = oneshot::channel();
    let worker = tokio::spawn(command_service.run(stop_rx));

    shutdown_signal().await;
    tracing::info!("shutting down");

    let _ = stop_tx.send(());
    let _ = time::timeout(SHUTDOWN_GRACE, worker).await;
}

async fn shutdown_signal() {
    let interrupt = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install interrupt handler.");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install terminate handler.")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}
