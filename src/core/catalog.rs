//! In-memory, format-agnostic string catalog.
//!
//! A [`Catalog`] is an ordered list of `(key, text)` entries, unique by key.
//! It is built from a parsed catalog file ([`Catalog::from_tree`]) or from a
//! flat `namespace:path -> text` mapping ([`Catalog::from_flat_map`]) and
//! converted back the same two ways.
//!
//! Non-string leaves of a parsed file (numbers, booleans, null, empty
//! containers) are not entries. They are kept beside the entries, anchored to
//! the entry they followed, so [`Catalog::to_tree`] puts them back in place.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::error::{Error, Result};
use super::key::TranslationKey;
use super::tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: TranslationKey,
    pub value: String,
}

impl CatalogEntry {
    pub fn new(key: TranslationKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// A leaf carried through unchanged. `after` is the entry it followed in the
/// file, `None` when it came before every entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Passthrough {
    after: Option<TranslationKey>,
    path: String,
    value: Value,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<TranslationKey, usize>,
    passthrough: Vec<Passthrough>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries. When a key repeats, the last value wins
    /// and the entry keeps the position of its first occurrence.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry.key, entry.value);
        }
        catalog
    }

    /// Flatten a parsed catalog file whose namespace is `namespace`.
    pub fn from_tree(namespace: &str, tree: &Value) -> Result<Self> {
        let mut catalog = Self::new();
        let mut last: Option<TranslationKey> = None;
        for (path, leaf) in tree::flatten(tree)? {
            match leaf {
                Value::String(text) => {
                    let key = TranslationKey::new(namespace, path);
                    catalog.insert(key.clone(), text);
                    last = Some(key);
                }
                value => catalog.passthrough.push(Passthrough {
                    after: last.clone(),
                    path,
                    value,
                }),
            }
        }
        Ok(catalog)
    }

    /// Build a catalog from fully-qualified `namespace:path` keys.
    pub fn from_flat_map<'a, I>(map: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let entries = map
            .into_iter()
            .map(|(key, value)| Ok(CatalogEntry::new(TranslationKey::parse(key)?, value)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_entries(entries))
    }

    /// Rebuild the nested tree of this catalog's namespace.
    ///
    /// All entries must share one namespace; mixing namespaces would
    /// silently merge unrelated files into one tree.
    pub fn to_tree(&self) -> Result<Value> {
        if let Some(first) = self.entries.first()
            && let Some(other) = self
                .entries
                .iter()
                .find(|e| e.key.namespace() != first.key.namespace())
        {
            return Err(Error::conflict(
                other.key.to_string(),
                format!(
                    "catalog mixes namespaces \"{}\" and \"{}\"",
                    first.key.namespace(),
                    other.key.namespace()
                ),
            ));
        }

        let mut anchored: HashMap<Option<&TranslationKey>, Vec<&Passthrough>> = HashMap::new();
        for leaf in &self.passthrough {
            anchored.entry(leaf.after.as_ref()).or_default().push(leaf);
        }

        let mut leaves: Vec<(&str, Value)> = Vec::new();
        let anchors = std::iter::once(None).chain(self.entries.iter().map(Some));
        for anchor in anchors {
            if let Some(entry) = anchor {
                leaves.push((entry.key.path(), Value::String(entry.value.clone())));
            }
            for leaf in anchored.remove(&anchor.map(|e| &e.key)).unwrap_or_default() {
                leaves.push((leaf.path.as_str(), leaf.value.clone()));
            }
        }

        tree::unflatten(leaves)
    }

    pub fn to_flat_map(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|e| (e.key.to_string(), Value::String(e.value.clone())))
            .collect()
    }

    /// Fold `incoming` over `self`: incoming values win on conflict, keys
    /// only present in `self` are kept unchanged, new keys are appended in
    /// incoming order.
    pub fn merge(&self, incoming: &Catalog) -> Catalog {
        let mut merged = self.clone();
        for entry in &incoming.entries {
            merged.insert(entry.key.clone(), entry.value.clone());
        }
        merged
    }

    /// Insert or overwrite a single entry. A carried leaf at the same path
    /// is replaced.
    pub fn insert(&mut self, key: TranslationKey, value: String) {
        self.passthrough.retain(|leaf| leaf.path != key.path());
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].value = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(CatalogEntry { key, value });
            }
        }
    }

    pub fn has_key(&self, key: &TranslationKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &TranslationKey) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].value.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &TranslationKey> {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &TranslationKey) -> Option<String> {
        let pos = *self.index.get(key)?;
        let value = self.entries[pos].value.clone();
        self.retain(|entry| entry.key != *key);
        Some(value)
    }

    /// Keep only entries for which `keep` returns true. Returns the removed keys.
    ///
    /// Carried leaves anchored to a removed entry move to the closest kept
    /// entry before it.
    pub fn retain(&mut self, mut keep: impl FnMut(&CatalogEntry) -> bool) -> Vec<TranslationKey> {
        let mut removed = Vec::new();
        let mut reanchor: HashMap<TranslationKey, Option<TranslationKey>> = HashMap::new();
        let mut last_kept: Option<TranslationKey> = None;
        self.entries.retain(|entry| {
            let kept = keep(entry);
            if kept {
                last_kept = Some(entry.key.clone());
            } else {
                removed.push(entry.key.clone());
                reanchor.insert(entry.key.clone(), last_kept.clone());
            }
            kept
        });
        if removed.is_empty() {
            return removed;
        }

        for leaf in &mut self.passthrough {
            if let Some(after) = &leaf.after
                && let Some(anchor) = reanchor.get(after)
            {
                leaf.after = anchor.clone();
            }
        }
        self.reindex();
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.key.clone(), pos))
            .collect();
    }
}

/// Catalogs compare by content in order, carried leaves included.
impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.passthrough == other.passthrough
    }
}

impl Eq for Catalog {}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<T: IntoIterator<Item = CatalogEntry>>(iter: T) -> Self {
        Self::from_entries(iter)
    }
}
