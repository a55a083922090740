//! Structured-text codecs for catalog files.
//!
//! The format of a catalog file is chosen purely by its extension through
//! [`FORMATS`]. Every codec converts to and from a `serde_json::Value`, which
//! is the tree representation the rest of the crate works with.

use std::path::Path;

use enum_dispatch::enum_dispatch;
use serde_json::Value;

use super::error::{Error, Result};

/// Extension lookup table. Extensions are matched case-insensitively.
pub const FORMATS: &[(&str, Format)] = &[
    ("json", Format::Json(JsonCodec)),
    ("yaml", Format::Yaml(YamlCodec)),
    ("yml", Format::Yaml(YamlCodec)),
    ("toml", Format::Toml(TomlCodec)),
];

#[enum_dispatch(Codec)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json(JsonCodec),
    Yaml(YamlCodec),
    Toml(TomlCodec),
}

impl Format {
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        FORMATS
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, format)| *format)
    }

    /// Select the codec for `path`, failing with [`Error::UnsupportedFormat`].
    pub fn for_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Json(_) => "JSON",
            Format::Yaml(_) => "YAML",
            Format::Toml(_) => "TOML",
        }
    }
}

/// Parse/serialize capability implemented by every supported format.
#[enum_dispatch]
pub trait Codec {
    fn parse(&self, text: &str) -> std::result::Result<Value, String>;
    fn serialize(&self, tree: &Value) -> std::result::Result<String, String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn parse(&self, text: &str) -> std::result::Result<Value, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    fn serialize(&self, tree: &Value) -> std::result::Result<String, String> {
        let mut content = serde_json::to_string_pretty(tree).map_err(|e| e.to_string())?;
        if !content.ends_with('\n') {
            content.push('\n');
        }
        Ok(content)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn parse(&self, text: &str) -> std::result::Result<Value, String> {
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }

    fn serialize(&self, tree: &Value) -> std::result::Result<String, String> {
        serde_yaml::to_string(tree).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TomlCodec;

impl Codec for TomlCodec {
    fn parse(&self, text: &str) -> std::result::Result<Value, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    fn serialize(&self, tree: &Value) -> std::result::Result<String, String> {
        if !tree.is_object() {
            return Err("TOML documents must be a table at the top level".to_string());
        }
        let table = toml::Value::try_from(tree).map_err(|e| e.to_string())?;
        toml::to_string(&table).map_err(|e| e.to_string())
    }
}
