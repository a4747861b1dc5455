use std::sync::Arc;

use teloxide::prelude::*;
use tracing_subscriber::EnvFilter;

mod api;
mod bot;
mod config;

use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🤖 Starting chat router bot...");

    // Missing secrets abort here
    let config = AppConfig::from_env()?;

    let bot = Bot::new(&config.telegram_bot_token);
    let state = Arc::new(bot::AppState::new(config)?);
    tracing::info!(
        "Config loaded. Command prefixes: {:?}, fetch timeouts: {:?}",
        state.config.command_prefixes,
        state.config.fetch_timeouts
    );

    Dispatcher::builder(bot, bot::build_handler())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
