use std::sync::Arc;

use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    prelude::*,
    types::CallbackQuery,
};

use crate::{
    catalog::{Catalog, Reply, TriggerKind},
    error::HandlerResult,
};

use super::reply::send_reply;

fn match_callback_trigger(q: CallbackQuery, catalog: Arc<Catalog>) -> Option<Reply> {
    q.data
        .as_deref()
        .and_then(|data| catalog.lookup(TriggerKind::Callback, data))
        .cloned()
}

async fn handle_callback_trigger(bot: Bot, q: CallbackQuery, reply: Reply, catalog: Arc<Catalog>) -> HandlerResult<()> {
    // Without an answer the client keeps the button spinner running.
    if let Err(e) = bot.answer_callback_query(&q.id).await {
        error!("Failed to answer callback query {}: {}", q.id, e);
    }

    let chat_id = q
        .message
        .as_ref()
        .map(|message| message.chat().id)
        .unwrap_or_else(|| ChatId::from(q.from.id));

    debug!("Callback trigger {:?} from chat {}", q.data, chat_id.0);
    send_reply(&bot, &catalog, chat_id, &reply).await;

    Ok(())
}

/// Unknown callback data is dropped without answering the query.
pub async fn handle_callback_unknown(q: CallbackQuery) -> HandlerResult<()> {
    debug!("No trigger for callback {:?} from user {}", q.data, q.from.id.0);
    Ok(())
}

pub fn get_callback_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_callback_query()
        .filter_map(match_callback_trigger)
        .endpoint(handle_callback_trigger)
}
