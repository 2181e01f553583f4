use reqwest::Client;

use crate::error::BotResult;

pub const DEFAULT_USER_AGENT: &str = concat!("yogabot/", env!("CARGO_PKG_VERSION"));

/// teloxide's own client settings (timeouts, pooling) with our user agent.
pub fn create_telegram_client() -> BotResult<Client> {
    let client = teloxide::net::default_reqwest_settings()
        .user_agent(DEFAULT_USER_AGENT)
        .build()?;

    Ok(client)
}
