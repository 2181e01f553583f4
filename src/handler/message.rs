use std::sync::Arc;

use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    prelude::*,
};

use crate::{
    catalog::{Catalog, Reply, TriggerKind},
    error::HandlerResult,
};

use super::reply::send_reply;

// Reply-keyboard taps arrive here as plain message text.
fn match_text_trigger(msg: Message, catalog: Arc<Catalog>) -> Option<Reply> {
    msg.text()
        .and_then(|text| catalog.lookup(TriggerKind::Text, text))
        .cloned()
}

async fn handle_text_trigger(bot: Bot, msg: Message, reply: Reply, catalog: Arc<Catalog>) -> HandlerResult<()> {
    debug!("Text trigger {:?} from chat {}", msg.text(), msg.chat.id.0);
    send_reply(&bot, &catalog, msg.chat.id, &reply).await;
    Ok(())
}

/// Text that is neither a command nor a trigger gets no reply.
pub async fn handle_message_unknown(msg: Message) -> HandlerResult<()> {
    debug!("No trigger for {:?} from chat {}", msg.text(), msg.chat.id.0);
    Ok(())
}

pub fn get_message_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    Update::filter_message()
        .filter_map(match_text_trigger)
        .endpoint(handle_text_trigger)
}
