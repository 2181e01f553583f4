mod model;

pub use model::*;

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use teloxide::types::ReplyMarkup;

use crate::{config::CatalogConfig, keyboard};

const EMBEDDED_CATALOG: &str = include_str!("../../assets/catalog.json");

const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate {kind} trigger `{label}`")]
    DuplicateTrigger { kind: TriggerKind, label: String },

    #[error("Unknown keyboard `{0}`")]
    UnknownKeyboard(String),

    #[error("Keyboard `{0}` has no buttons")]
    EmptyKeyboard(String),

    #[error("Button `{text}` in keyboard `{keyboard}` needs exactly one of `callback` or `url`")]
    InvalidButton { keyboard: String, text: String },

    #[error("Invalid url `{url}` in keyboard `{keyboard}`: {source}")]
    InvalidUrl {
        keyboard: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Routing table from trigger to reply, with the keyboards replies refer to.
#[derive(Clone, Debug)]
pub struct Catalog {
    welcome: Reply,
    help: Reply,
    routes: HashMap<(TriggerKind, String), Reply>,
    keyboards: HashMap<String, ReplyMarkup>,
}

impl Catalog {
    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        match &config.path {
            Some(path) => {
                info!("Loading catalog from {}", path.display());
                let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                    path: path.clone(),
                    source,
                })?;
                Self::from_json(&raw)
            }
            None => Self::embedded(),
        }
    }

    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let mut keyboards = HashMap::with_capacity(document.keyboards.len());
        for (name, layout) in &document.keyboards {
            keyboards.insert(name.clone(), keyboard::build_markup(name, layout)?);
        }

        let mut routes = HashMap::with_capacity(document.entries.len());
        for entry in document.entries {
            check_keyboard_ref(&entry.reply, &keyboards)?;

            let key = (entry.kind, entry.trigger);
            if routes.contains_key(&key) {
                let (kind, label) = key;
                return Err(CatalogError::DuplicateTrigger { kind, label });
            }
            routes.insert(key, entry.reply);
        }

        check_keyboard_ref(&document.welcome, &keyboards)?;
        check_keyboard_ref(&document.help, &keyboards)?;

        warn_unrouted_buttons(&document.keyboards, &routes);

        Ok(Self {
            welcome: document.welcome,
            help: document.help,
            routes,
            keyboards,
        })
    }

    /// Exact-match lookup. No prefix or pattern matching.
    pub fn lookup(&self, kind: TriggerKind, label: &str) -> Option<&Reply> {
        self.routes.get(&(kind, label.to_string()))
    }

    /// The greeting for `/start` with the sender's name filled in.
    pub fn welcome(&self, name: &str) -> Reply {
        let mut reply = self.welcome.clone();
        reply.text = reply.text.replace(NAME_PLACEHOLDER, &reply.style.escape(name));
        reply
    }

    pub fn help(&self) -> &Reply {
        &self.help
    }

    pub fn markup(&self, name: &str) -> Option<&ReplyMarkup> {
        self.keyboards.get(name)
    }

    pub fn triggers(&self) -> impl Iterator<Item = (TriggerKind, &str)> {
        self.routes.keys().map(|(kind, label)| (*kind, label.as_str()))
    }

    /// Photo files referenced by any reply that are not readable files right now.
    pub fn missing_photos(&self) -> Vec<&Path> {
        let mut missing: Vec<&Path> = self
            .routes
            .values()
            .chain([&self.welcome, &self.help])
            .filter_map(|reply| reply.photo.as_ref())
            .map(|photo| photo.path.as_path())
            .filter(|path| !path.is_file())
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn check_keyboard_ref(reply: &Reply, keyboards: &HashMap<String, ReplyMarkup>) -> Result<(), CatalogError> {
    match &reply.keyboard {
        Some(name) if !keyboards.contains_key(name) => Err(CatalogError::UnknownKeyboard(name.clone())),
        _ => Ok(()),
    }
}

// A button with no route is a silent no-op when tapped.
fn warn_unrouted_buttons(layouts: &HashMap<String, KeyboardLayout>, routes: &HashMap<(TriggerKind, String), Reply>) {
    let routed: HashSet<(TriggerKind, &str)> = routes.keys().map(|(kind, label)| (*kind, label.as_str())).collect();

    for (name, layout) in layouts {
        match layout {
            KeyboardLayout::Reply { rows } => {
                for label in rows.iter().flatten() {
                    if !routed.contains(&(TriggerKind::Text, label.as_str())) {
                        warn!("Keyboard `{}` has button `{}` with no matching text trigger", name, label);
                    }
                }
            }
            KeyboardLayout::Inline { rows } => {
                for data in rows.iter().flatten().filter_map(|b| b.callback.as_deref()) {
                    if !routed.contains(&(TriggerKind::Callback, data)) {
                        warn!("Keyboard `{}` has callback `{}` with no matching callback trigger", name, data);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "welcome": { "text": "Привет, {name}!", "keyboard": "main" },
        "help": { "text": "help" },
        "keyboards": {
            "main": { "kind": "reply", "rows": [["about"]] }
        },
        "entries": [
            { "kind": "text", "trigger": "about", "reply": { "text": "about us" } },
            { "kind": "callback", "trigger": "about", "reply": { "text": "<b>about</b>", "style": "html" } }
        ]
    }"#;

    #[test]
    fn test_embedded_catalog_is_valid() {
        let catalog = Catalog::embedded().unwrap();

        assert!(!catalog.is_empty());
        assert!(catalog.markup("main").is_some());
        assert!(catalog.markup("subscription").is_some());
        assert!(catalog.lookup(TriggerKind::Text, "🧘‍♂️ О нас").is_some());
        assert!(catalog.lookup(TriggerKind::Callback, "subscription_details").is_some());
    }

    #[test]
    fn test_every_main_keyboard_label_is_routed() {
        let document: CatalogDocument = serde_json::from_str(EMBEDDED_CATALOG).unwrap();
        let catalog = Catalog::from_document(document.clone()).unwrap();

        let Some(KeyboardLayout::Reply { rows }) = document.keyboards.get("main") else {
            panic!("main keyboard should be a reply keyboard");
        };
        for label in rows.iter().flatten() {
            assert!(
                catalog.lookup(TriggerKind::Text, label).is_some(),
                "label {} has no route",
                label
            );
        }
    }

    #[test]
    fn test_lookup_is_exact_and_kind_scoped() {
        let catalog = Catalog::from_json(MINIMAL).unwrap();

        assert_eq!(catalog.lookup(TriggerKind::Text, "about").unwrap().text, "about us");
        assert_eq!(catalog.lookup(TriggerKind::Callback, "about").unwrap().text, "<b>about</b>");
        assert!(catalog.lookup(TriggerKind::Text, "About").is_none());
        assert!(catalog.lookup(TriggerKind::Text, "about ").is_none());
        assert!(catalog.lookup(TriggerKind::Text, "abo").is_none());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_lookup_is_repeatable() {
        let catalog = Catalog::from_json(MINIMAL).unwrap();

        let first = catalog.lookup(TriggerKind::Text, "about").cloned();
        let second = catalog.lookup(TriggerKind::Text, "about").cloned();
        assert_eq!(first, second);
    }

    #[test]
    fn test_welcome_fills_in_name() {
        let catalog = Catalog::from_json(MINIMAL).unwrap();

        let reply = catalog.welcome("Анна");
        assert_eq!(reply.text, "Привет, Анна!");
        assert_eq!(reply.keyboard.as_deref(), Some("main"));
    }

    #[test]
    fn test_welcome_escapes_name_for_html() {
        let raw = MINIMAL.replace(
            r#""text": "Привет, {name}!", "keyboard": "main""#,
            r#""text": "<b>Привет, {name}!</b>", "style": "html""#,
        );
        let catalog = Catalog::from_json(&raw).unwrap();

        assert_eq!(catalog.welcome("<Анна>").text, "<b>Привет, &lt;Анна&gt;!</b>");
    }

    #[test]
    fn test_duplicate_trigger_is_rejected() {
        let raw = MINIMAL.replace(r#""trigger": "about", "reply": { "text": "<b>"#, r#""trigger": "x", "reply": { "text": "<b>"#);
        let raw = raw.replace(r#""kind": "callback", "trigger": "x""#, r#""kind": "text", "trigger": "about""#);

        let err = Catalog::from_json(&raw).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTrigger { kind: TriggerKind::Text, label } if label == "about"));
    }

    #[test]
    fn test_unknown_keyboard_is_rejected() {
        let raw = MINIMAL.replace(r#""keyboard": "main""#, r#""keyboard": "missing""#);

        let err = Catalog::from_json(&raw).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownKeyboard(name) if name == "missing"));
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        assert!(matches!(Catalog::from_json("{"), Err(CatalogError::Parse(_))));
        assert!(matches!(Catalog::from_json(r#"{"entries": []}"#), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_embedded_photos_ship_with_the_crate() {
        let catalog = Catalog::embedded().unwrap();
        let photos: Vec<&PhotoAttachment> = catalog.routes.values().filter_map(|r| r.photo.as_ref()).collect();

        assert!(!photos.is_empty());
        for photo in photos {
            // catalog photo paths are relative to the working directory, the crate root when deployed
            let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(&photo.path);
            assert!(path.is_file(), "{} is not shipped", photo.path.display());
        }
    }

    #[test]
    fn test_missing_photo_is_reported() {
        let raw = MINIMAL.replace(
            r#"{ "text": "about us" }"#,
            r#"{ "text": "about us", "photo": { "path": "/nonexistent-dir/about.png", "fallback": "no photo" } }"#,
        );
        let catalog = Catalog::from_json(&raw).unwrap();

        assert_eq!(catalog.missing_photos(), vec![Path::new("/nonexistent-dir/about.png")]);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("yogabot-catalog-{}.json", std::process::id()));
        std::fs::write(&path, MINIMAL).unwrap();

        let catalog = Catalog::load(&CatalogConfig {
            path: Some(path.clone()),
        })
        .unwrap();
        assert_eq!(catalog.len(), 2);

        std::fs::remove_file(&path).unwrap();

        let err = Catalog::load(&CatalogConfig { path: Some(path) }).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
