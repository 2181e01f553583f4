use teloxide::RequestError;

use crate::{catalog::CatalogError, config::ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),

    #[error("Telegram request error: {0}")]
    RequestError(#[from] RequestError),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Log sink error: {0}")]
    LoggerError(String),

    #[error("Webhook server error: {0}")]
    ServerError(#[from] std::io::Error),

    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for BotError {
    fn from(error: anyhow::Error) -> Self {
        BotError::Other(error)
    }
}

pub type HandlerResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub type BotResult<T> = Result<T, BotError>;
