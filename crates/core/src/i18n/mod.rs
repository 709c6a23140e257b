//! Locale resolution and string translation.
//!
//! English strings double as their own lookup keys. The default locale has no
//! dictionary at all; other locales ship a flat JSON map compiled into the
//! crate. A missing translation silently falls back to the English key.

mod translator;

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

pub use translator::Translator;

pub type Translations = HashMap<String, String>;
pub type InterpolationValues = HashMap<String, String>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Jp,
    Vn,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Jp, Locale::Vn];

    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Jp => "jp",
            Locale::Vn => "vn",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Locale> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.tag().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Resolve a language tag, falling back to the default locale.
pub fn get_locale_or_default(tag: &str) -> Locale {
    Locale::from_tag(tag).unwrap_or_else(|| {
        log::debug!("Unsupported locale '{}', using {}", tag, Locale::default());
        Locale::default()
    })
}

/// Per-locale dictionaries.
#[derive(Debug, Default)]
pub struct LocaleCatalog {
    dictionaries: HashMap<Locale, Translations>,
}

impl LocaleCatalog {
    /// Catalog built from the bundled locale assets.
    pub fn bundled() -> &'static LocaleCatalog {
        static CATALOG: OnceLock<LocaleCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            let mut catalog = LocaleCatalog::default();
            catalog.insert_json(Locale::Jp, include_str!("../../locales/jp.json"));
            catalog.insert_json(Locale::Vn, include_str!("../../locales/vn.json"));
            catalog
        })
    }

    pub fn insert(&mut self, locale: Locale, translations: Translations) {
        self.dictionaries.insert(locale, translations);
    }

    fn insert_json(&mut self, locale: Locale, json: &str) {
        match serde_json::from_str::<Translations>(json) {
            Ok(translations) => self.insert(locale, translations),
            Err(e) => log::error!("Locale asset for {} is invalid: {}", locale, e),
        }
    }

    pub fn lookup(&self, locale: Locale, text: &str) -> Option<&str> {
        self.dictionaries
            .get(&locale)?
            .get(text)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn translate(&self, text: &str, locale: Locale, values: &InterpolationValues) -> String {
        let base = if locale == Locale::default() {
            text
        } else {
            self.lookup(locale, text).unwrap_or(text)
        };
        interpolate(base, values)
    }
}

/// Translate `text` with the bundled catalog.
pub fn translate(text: &str, locale: Locale, values: &InterpolationValues) -> String {
    LocaleCatalog::bundled().translate(text, locale, values)
}

/// Replace `{{name}}` tokens. Without any values the text is returned as is;
/// otherwise unknown or empty values render as an empty string.
pub fn interpolate(text: &str, values: &InterpolationValues) -> String {
    if values.is_empty() {
        return text.to_string();
    }
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder =
        PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("static regex"));
    placeholder
        .replace_all(text, |caps: &Captures| {
            values.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}
