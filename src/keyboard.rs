use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup};
use url::Url;

use crate::catalog::{CatalogError, InlineButton, KeyboardLayout};

/// Turns a catalog layout into the markup sent with a reply.
pub fn build_markup(name: &str, layout: &KeyboardLayout) -> Result<ReplyMarkup, CatalogError> {
    match layout {
        KeyboardLayout::Reply { rows } => build_reply_keyboard(name, rows).map(ReplyMarkup::Keyboard),
        KeyboardLayout::Inline { rows } => build_inline_keyboard(name, rows).map(ReplyMarkup::InlineKeyboard),
    }
}

/// Persistent keyboard under the input field. A tap sends the label back as message text.
pub fn build_reply_keyboard(name: &str, rows: &[Vec<String>]) -> Result<KeyboardMarkup, CatalogError> {
    let rows: Vec<Vec<KeyboardButton>> = rows
        .iter()
        .filter(|row| !row.is_empty())
        .map(|row| row.iter().map(KeyboardButton::new).collect())
        .collect();

    if rows.is_empty() {
        return Err(CatalogError::EmptyKeyboard(name.to_string()));
    }

    Ok(KeyboardMarkup::new(rows).resize_keyboard().persistent())
}

pub fn build_inline_keyboard(name: &str, rows: &[Vec<InlineButton>]) -> Result<InlineKeyboardMarkup, CatalogError> {
    let mut keyboard = Vec::with_capacity(rows.len());

    for row in rows.iter().filter(|row| !row.is_empty()) {
        let mut buttons = Vec::with_capacity(row.len());
        for button in row {
            buttons.push(build_inline_button(name, button)?);
        }
        keyboard.push(buttons);
    }

    if keyboard.is_empty() {
        return Err(CatalogError::EmptyKeyboard(name.to_string()));
    }

    Ok(InlineKeyboardMarkup::new(keyboard))
}

fn build_inline_button(keyboard: &str, button: &InlineButton) -> Result<InlineKeyboardButton, CatalogError> {
    match (&button.callback, &button.url) {
        (Some(data), None) => Ok(InlineKeyboardButton::callback(button.text.clone(), data.clone())),
        (None, Some(raw)) => {
            let url = Url::parse(raw).map_err(|source| CatalogError::InvalidUrl {
                keyboard: keyboard.to_string(),
                url: raw.clone(),
                source,
            })?;
            Ok(InlineKeyboardButton::url(button.text.clone(), url))
        }
        _ => Err(CatalogError::InvalidButton {
            keyboard: keyboard.to_string(),
            text: button.text.clone(),
        }),
    }
}
