use std::{collections::HashMap, fmt, path::PathBuf};

use serde::Deserialize;
use teloxide::types::ParseMode;

/// The catalog as it is written on disk.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogDocument {
    pub welcome: Reply,
    pub help: Reply,
    #[serde(default)]
    pub keyboards: HashMap<String, KeyboardLayout>,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CatalogEntry {
    pub kind: TriggerKind,
    pub trigger: String,
    pub reply: Reply,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Message text, including reply-keyboard taps.
    Text,
    /// Inline button callback data.
    Callback,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerKind::Text => write!(f, "text"),
            TriggerKind::Callback => write!(f, "callback"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(default)]
    pub photo: Option<PhotoAttachment>,
    /// Name of a layout in `keyboards`.
    #[serde(default)]
    pub keyboard: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    #[default]
    Plain,
    Html,
    MarkdownV2,
}

impl TextStyle {
    pub fn parse_mode(self) -> Option<ParseMode> {
        match self {
            TextStyle::Plain => None,
            TextStyle::Html => Some(ParseMode::Html),
            TextStyle::MarkdownV2 => Some(ParseMode::MarkdownV2),
        }
    }

    /// Escapes user-provided text so it renders literally under this style.
    pub fn escape(self, s: &str) -> String {
        match self {
            TextStyle::Plain => s.to_string(),
            TextStyle::Html => teloxide::utils::html::escape(s),
            TextStyle::MarkdownV2 => teloxide::utils::markdown::escape(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PhotoAttachment {
    pub path: PathBuf,
    /// Sent as plain text when the file cannot be read.
    pub fallback: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyboardLayout {
    Reply { rows: Vec<Vec<String>> },
    Inline { rows: Vec<Vec<InlineButton>> },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct InlineButton {
    pub text: String,
    #[serde(default)]
    pub callback: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}
