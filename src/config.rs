use std::path::PathBuf;

use log::LevelFilter;
use url::Url;

use crate::webhook::WEBHOOK_PATH;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_LOG_FILE: &str = "bot.log";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0}")]
    MissingKey(&'static str),

    #[error("Invalid {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub mode: UpdateMode,
    pub catalog: CatalogConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug)]
pub struct TelegramConfig(pub String);

/// Where updates come from.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateMode {
    Polling,
    Webhook { url: Url, port: u16 },
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Replaces the embedded catalog when set.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: LevelFilter,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("TELEGRAM_TOKEN").ok_or(ConfigError::MissingKey("TELEGRAM_TOKEN"))?;

        let mode = match get("BOT_MODE").as_deref().unwrap_or("polling") {
            "polling" => UpdateMode::Polling,
            "webhook" => {
                let raw_url = get("WEBHOOK_URL").ok_or(ConfigError::MissingKey("WEBHOOK_URL"))?;
                let url = Url::parse(&raw_url).map_err(|e| ConfigError::InvalidValue {
                    key: "WEBHOOK_URL",
                    reason: e.to_string(),
                })?;
                // the route is fixed, so the registered URL has to point at it
                if url.path() != WEBHOOK_PATH {
                    return Err(ConfigError::InvalidValue {
                        key: "WEBHOOK_URL",
                        reason: format!("path must be `{}`, got `{}`", WEBHOOK_PATH, url.path()),
                    });
                }
                let port = match get("PORT") {
                    Some(port) => port.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                        key: "PORT",
                        reason: e.to_string(),
                    })?,
                    None => DEFAULT_PORT,
                };
                UpdateMode::Webhook { url, port }
            }
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "BOT_MODE",
                    reason: format!("expected `polling` or `webhook`, got `{}`", other),
                })
            }
        };

        let level = match get("RUST_LOG") {
            Some(level) => level.parse::<LevelFilter>().map_err(|e| ConfigError::InvalidValue {
                key: "RUST_LOG",
                reason: e.to_string(),
            })?,
            None => LevelFilter::Info,
        };

        Ok(AppConfig {
            telegram: TelegramConfig(token),
            mode,
            catalog: CatalogConfig {
                path: get("CATALOG_PATH").map(PathBuf::from),
            },
            log: LogConfig {
                file: get("LOG_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
                level,
            },
        })
    }
}
