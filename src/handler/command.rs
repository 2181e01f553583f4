use std::sync::Arc;

use teloxide::dispatching::{HandlerExt, UpdateHandler};
use teloxide::prelude::*;

use crate::catalog::Catalog;
use crate::command::Command;
use crate::error::HandlerResult;

use super::reply::send_reply;

/// Used in the greeting when the message carries no sender.
const DEFAULT_NAME: &str = "друг";

async fn handle_start(bot: &Bot, msg: &Message, catalog: &Catalog) {
    let name = msg
        .from
        .as_ref()
        .map(|user| user.first_name.as_str())
        .unwrap_or(DEFAULT_NAME);

    info!("User {} ({}) sent /start", name, msg.chat.id.0);

    let welcome = catalog.welcome(name);
    send_reply(bot, catalog, msg.chat.id, &welcome).await;
}

async fn handle_help(bot: &Bot, msg: &Message, catalog: &Catalog) {
    send_reply(bot, catalog, msg.chat.id, catalog.help()).await;
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command, catalog: Arc<Catalog>) -> HandlerResult<()> {
    match cmd {
        Command::Start => handle_start(&bot, &msg, &catalog).await,
        Command::Help => handle_help(&bot, &msg, &catalog).await,
    }

    Ok(())
}

pub fn get_command_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command)
}
