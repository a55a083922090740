//! Translation key model.
//!
//! A key addresses one translatable string across the whole catalog set of a
//! locale: the namespace is the file stem of the catalog file, the path is the
//! dot-delimited address of the leaf inside that file.
//!
//! ```
//! use dictsync::core::TranslationKey;
//!
//! let key: TranslationKey = "common:nav.home".parse().unwrap();
//! assert_eq!(key.namespace(), "common");
//! assert_eq!(key.path(), "nav.home");
//! assert_eq!(key.to_string(), "common:nav.home");
//! ```

use std::{fmt, path::Path, str::FromStr};

use super::error::{Error, Result};

/// Separator between namespace and path in the string form of a key.
pub const KEY_DELIMITER: char = ':';

/// Separator between segments of a path.
pub const PATH_DELIMITER: char = '.';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TranslationKey {
    namespace: String,
    path: String,
}

impl TranslationKey {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Parse `namespace:path`. The string is split at the first delimiter, so
    /// the path itself may contain `:`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(KEY_DELIMITER) {
            Some((namespace, path)) if !namespace.is_empty() && !path.is_empty() => {
                Ok(Self::new(namespace, path))
            }
            _ => Err(Error::InvalidKeyFormat(s.to_string())),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// True when the file stem of `filename` equals this key's namespace.
    pub fn matches_filename(&self, filename: impl AsRef<Path>) -> bool {
        namespace_of(filename).is_some_and(|ns| ns == self.namespace)
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, KEY_DELIMITER, self.path)
    }
}

impl FromStr for TranslationKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Namespace name of a catalog file: its base name with the extension stripped.
///
/// - "common.json" -> Some("common")
/// - "/dicts/en/auth.yaml" -> Some("auth")
pub fn namespace_of(filename: impl AsRef<Path>) -> Option<String> {
    filename
        .as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
