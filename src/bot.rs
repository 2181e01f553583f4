use std::sync::Arc;

use teloxide::dispatching::DefaultKey;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::Bot;
use url::Url;

use crate::catalog::Catalog;
use crate::command;
use crate::config::{AppConfig, UpdateMode};
use crate::error::BotResult;
use crate::handler::get_handler;
use crate::utils::http;
use crate::webhook;

pub struct BotService {
    pub bot: Bot,
    pub catalog: Arc<Catalog>,
    pub mode: UpdateMode,
}

impl BotService {
    pub fn new(config: &AppConfig, catalog: Catalog) -> BotResult<Self> {
        let client = http::create_telegram_client()?;
        let bot = Bot::with_client(config.telegram.0.clone(), client);

        info!("Bot instance created");

        Ok(Self {
            bot,
            catalog: Arc::new(catalog),
            mode: config.mode.clone(),
        })
    }

    pub async fn start(&self) -> BotResult<()> {
        info!("Testing connection to Telegram API...");
        match self.bot.get_me().await {
            Ok(me) => info!("Successfully connected to Telegram API as @{}", me.username()),
            Err(e) => {
                error!("Failed to connect to Telegram API: {:?}", e);
                return Err(anyhow::anyhow!("Failed to connect to Telegram API: {}", e).into());
            }
        }

        if let Err(e) = command::setup_user_commands(&self.bot).await {
            warn!("Failed to register bot commands: {}", e);
        }

        match &self.mode {
            UpdateMode::Polling => self.start_polling().await,
            UpdateMode::Webhook { url, port } => self.start_webhook(url.clone(), *port).await,
        }
    }

    // Both update sources feed the same handler tree and dependencies.
    fn build_dispatcher(&self) -> Dispatcher<Bot, Box<dyn std::error::Error + Send + Sync>, DefaultKey> {
        Dispatcher::builder(self.bot.clone(), get_handler())
            .dependencies(dptree::deps![Arc::clone(&self.catalog)])
            .default_handler(|_| async {})
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
    }

    async fn start_polling(&self) -> BotResult<()> {
        // getUpdates is refused while a webhook is registered
        self.bot.delete_webhook().await?;
        info!("Webhook removed, starting long polling");

        self.build_dispatcher().dispatch().await;

        Ok(())
    }

    async fn start_webhook(&self, url: Url, port: u16) -> BotResult<()> {
        // Telegram starts delivering as soon as the webhook is set
        let tcp = webhook::bind(port).await?;

        info!("Registering webhook {}", url);
        self.bot.set_webhook(url).await?;

        let (updates, stop, listener) = webhook::channel_listener();
        let server = tokio::spawn(webhook::serve(tcp, updates, stop));

        self.build_dispatcher()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
            )
            .await;

        server
            .await
            .map_err(|e| anyhow::anyhow!("Webhook listener task failed: {}", e))?
    }
}
