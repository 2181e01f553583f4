use teloxide::{
    payloads::{SendMessageSetters, SendPhotoSetters},
    prelude::*,
    types::{InputFile, ReplyMarkup},
    RequestError,
};

use crate::catalog::{Catalog, PhotoAttachment, Reply, TextStyle};

/// Sends a catalog reply. Failures are logged and dropped, there is no retry.
pub async fn send_reply(bot: &Bot, catalog: &Catalog, chat_id: ChatId, reply: &Reply) {
    let markup = match reply.keyboard.as_deref() {
        Some(name) => {
            let markup = catalog.markup(name).cloned();
            if markup.is_none() {
                warn!("Keyboard `{}` is not in the catalog, sending without it", name);
            }
            markup
        }
        None => None,
    };

    let result = match &reply.photo {
        Some(photo) => send_photo(bot, chat_id, reply, photo, markup).await,
        None => send_text(bot, chat_id, &reply.text, reply.style, markup).await,
    };

    match result {
        Ok(_) => info!("Reply sent to chat {}", chat_id.0),
        Err(e) => error!("Failed to send reply to chat {}: {}", chat_id.0, e),
    }
}

async fn send_text(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
    style: TextStyle,
    markup: Option<ReplyMarkup>,
) -> Result<Message, RequestError> {
    let mut request = bot.send_message(chat_id, text);
    if let Some(mode) = style.parse_mode() {
        request = request.parse_mode(mode);
    }
    if let Some(markup) = markup {
        request = request.reply_markup(markup);
    }
    request.await
}

async fn send_photo(
    bot: &Bot,
    chat_id: ChatId,
    reply: &Reply,
    photo: &PhotoAttachment,
    markup: Option<ReplyMarkup>,
) -> Result<Message, RequestError> {
    let bytes = match tokio::fs::read(&photo.path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(
                "Photo {} is unavailable ({}), sending fallback text to chat {}",
                photo.path.display(),
                e,
                chat_id.0
            );
            return send_text(bot, chat_id, &photo.fallback, TextStyle::Plain, markup).await;
        }
    };

    let file_name = photo
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo.jpg".to_string());

    let mut request = bot
        .send_photo(chat_id, InputFile::memory(bytes).file_name(file_name))
        .caption(reply.text.clone());
    if let Some(mode) = reply.style.parse_mode() {
        request = request.parse_mode(mode);
    }
    if let Some(markup) = markup {
        request = request.reply_markup(markup);
    }
    request.await
}
