mod bot;
mod config;
mod forward;
mod webhook;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Port the webhook receiver listens on.
const WEBHOOK_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"));

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Initialize logging; the config debug flag raises the default filter
    // unless RUST_LOG overrides it.
    let default_filter = if config.debug {
        "info,message_forwarder=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Message Forwarder starting");
    info!("Configuration loaded from: {}", config_path.display());

    if config.webhook_mode {
        info!("Webhook mode enabled");
        webhook::run(config, WEBHOOK_PORT).await
    } else {
        info!("Bot polling mode enabled");
        bot::run(config).await
    }
}
