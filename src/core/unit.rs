//! Request and result records exchanged with a translator.

use serde::Serialize;

use super::catalog::CatalogEntry;
use super::key::TranslationKey;

/// One string to translate from `source_locale` into `target_locale`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationUnit {
    #[serde(skip)]
    pub key: TranslationKey,
    pub source_text: String,
    pub source_locale: String,
    pub target_locale: String,
}

impl TranslationUnit {
    pub fn new(
        key: TranslationKey,
        source_text: impl Into<String>,
        source_locale: impl Into<String>,
        target_locale: impl Into<String>,
    ) -> Self {
        Self {
            key,
            source_text: source_text.into(),
            source_locale: source_locale.into(),
            target_locale: target_locale.into(),
        }
    }
}

/// A unit together with the text the provider produced for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub unit: TranslationUnit,
    pub translation: String,
}

impl Translation {
    pub fn new(unit: TranslationUnit, translation: impl Into<String>) -> Self {
        Self {
            unit,
            translation: translation.into(),
        }
    }

    pub fn key(&self) -> &TranslationKey {
        &self.unit.key
    }

    pub fn into_entry(self) -> CatalogEntry {
        CatalogEntry::new(self.unit.key, self.translation)
    }
}
