//! slirc-presence - IRC contact presence tracker
//!
//! Connects to one server, registers, and logs when configured contacts come
//! online or go offline.

use slirc_presence::client;
use slirc_presence::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "presence.toml".to_string());

    let config = Config::load_validated(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.address(),
        nick = %config.server.nick,
        contacts = config.presence.contacts.len(),
        "Starting slirc-presence"
    );

    let (handle, mut task) = client::connect(config).await?;
    let mut events = handle.subscribe();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => info!(
                    nick = %event.nick,
                    status = if event.online { "online" } else { "offline" },
                    "Presence"
                ),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Presence events dropped");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, shutting down");
                handle.quit(Some("Shutting down".to_string())).await?;
                break;
            }

            result = &mut task => {
                result??;
                return Ok(());
            }
        }
    }

    task.await??;
    Ok(())
}
