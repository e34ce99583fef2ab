//! Accessible Scrabble game server.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod narration;
mod protocol;
mod room;
mod server;

use config::ServerConfig;
use server::ServerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Accessible Scrabble server...");

    let dictionary = config.load_dictionary()?;
    info!("Loaded {} dictionary words", dictionary.len());

    let (narration_tx, narration_rx) = narration::channel();
    let state = Arc::new(ServerState::new(dictionary, narration_tx, config.ai_seed));
    tokio::spawn(narration::run_narrator(narration_rx, Arc::clone(&state)));

    server::run_server(config.addr, state).await
}
