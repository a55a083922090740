//! `--only` selection patterns.
//!
//! A selection restricts a run to one key (`common:title`) or to every key
//! under a path prefix (`common:nav.*`). Selected keys are always requested,
//! even when the target catalog already has them.

use std::{fmt, path::Path, str::FromStr};

use super::error::{Error, Result};
use super::key::TranslationKey;

const WILDCARD: char = '*';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSpec {
    pub key: TranslationKey,
    pub prefix_match: bool,
}

impl SelectionSpec {
    pub fn parse(s: &str) -> Result<Self> {
        let (body, prefix_match) = match s.strip_suffix(WILDCARD) {
            Some(body) => (body, true),
            None => (s, false),
        };

        if body.contains(WILDCARD) {
            return Err(Error::InvalidSelectionFormat(s.to_string()));
        }

        let key =
            TranslationKey::parse(body).map_err(|_| Error::InvalidSelectionFormat(s.to_string()))?;

        Ok(Self { key, prefix_match })
    }

    /// Whether the catalog file `filename` can contain selected keys.
    pub fn matches_filename(&self, filename: impl AsRef<Path>) -> bool {
        self.key.matches_filename(filename)
    }

    pub fn matches_key(&self, key: &TranslationKey) -> bool {
        if key.namespace() != self.key.namespace() {
            return false;
        }
        if self.prefix_match {
            key.path().starts_with(self.key.path())
        } else {
            key.path() == self.key.path()
        }
    }
}

impl fmt::Display for SelectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if self.prefix_match {
            write!(f, "{}", WILDCARD)?;
        }
        Ok(())
    }
}

impl FromStr for SelectionSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
