pub mod commands;
pub mod handlers;
pub mod messages;
pub mod poll;
pub mod session;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;

use crate::api::Apis;
use crate::config::AppConfig;
use commands::{Action, CommandParser, Router};
use session::SessionRegistry;

/// Shared application state, accessible from all handlers.
pub struct AppState {
    pub config: AppConfig,
    pub apis: Apis,
    pub sessions: SessionRegistry,
    pub parser: CommandParser,
    pub router: Router<Action>,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            apis: Apis::new(&config)?,
            sessions: SessionRegistry::new(),
            parser: CommandParser::new(&config.command_prefixes),
            router: Router::standard(),
            config,
        })
    }
}

/// Build the teloxide update handler tree.
pub fn build_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message))
}
