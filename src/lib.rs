//! dictsync - keep i18n catalogs of every locale in sync with the source locale
//!
//! dictsync reads the namespace files of a source locale (JSON, YAML or TOML),
//! finds the keys each target locale is missing and fills them in through a
//! machine translation provider (Amazon Translate, OpenAI or Anthropic).
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, progress, report)
//! - `config`: Configuration file loading and parsing
//! - `core`: Key model, catalogs, codecs, on-disk store and the reconciliation engine
//! - `translator`: Translation provider backends

pub mod cli;
pub mod config;
pub mod core;
pub mod translator;
