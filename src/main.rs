use bot::BotService;
use catalog::Catalog;
use config::{AppConfig, UpdateMode};
use error::BotResult;

#[macro_use]
extern crate log;

mod bot;
mod catalog;
mod command;
mod config;
mod error;
mod handler;
mod keyboard;
mod utils;
mod webhook;


#[tokio::main]
async fn main() -> BotResult<()> {
    // a missing .env is fine, the real environment may carry everything
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    utils::logger::init(&config.log)?;

    info!("Starting bot...");
    match &config.mode {
        UpdateMode::Polling => info!("Update mode: polling"),
        UpdateMode::Webhook { url, port } => info!("Update mode: webhook {} on port {}", url, port),
    }

    let catalog = Catalog::load(&config.catalog)?;
    if catalog.is_empty() {
        warn!("Catalog has no triggers, only /start and /help will be answered");
    }
    for path in catalog.missing_photos() {
        warn!("Photo {} not found, its fallback text will be sent instead", path.display());
    }
    for (kind, label) in catalog.triggers() {
        debug!("Routing {} trigger {:?}", kind, label);
    }
    info!("Catalog ready with {} triggers", catalog.len());

    info!("Initializing BotService...");
    let bot_service = BotService::new(&config, catalog)?;

    bot_service.start().await
}
