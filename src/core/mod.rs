//! Catalog model and reconciliation engine.
//!
//! - `key`, `selection`: translation keys and `--only` patterns
//! - `tree`, `catalog`: nested trees and the flat catalogs built from them
//! - `codec`, `store`: file formats and the on-disk locale layout
//! - `engine`: decides what to translate and folds results back

pub mod catalog;
pub mod codec;
pub mod engine;
pub mod error;
pub mod key;
pub mod locale;
pub mod selection;
pub mod store;
pub mod tree;
pub mod unit;

pub use catalog::{Catalog, CatalogEntry};
pub use codec::{Codec, Format};
pub use engine::{PairOutcome, Reconciler, RunObserver, RunOptions, RunSummary};
pub use error::{Error, Result};
pub use key::TranslationKey;
pub use selection::SelectionSpec;
pub use store::{CatalogStore, SkipReason, Skipped};
pub use unit::{Translation, TranslationUnit};
