//! Error kinds shared by the catalog model, the store and the translator backends.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A key string is not `namespace:path` with both parts non-empty.
    #[error("Invalid key format: \"{0}\". Expected format: namespace:path")]
    InvalidKeyFormat(String),

    /// A selection pattern is not `namespace:path` or `namespace:path*`.
    #[error("Invalid selection format: \"{0}\". Expected namespace:path or namespace:path*")]
    InvalidSelectionFormat(String),

    /// No codec is registered for this file extension.
    #[error("Unsupported file extension: \"{0}\"")]
    UnsupportedFormat(String),

    /// Flattening or un-flattening hit two incompatible assignments to the same path.
    #[error("Structural conflict at \"{path}\": {reason}")]
    StructuralConflict { path: String, reason: String },

    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize {}: {message}", .path.display())]
    Serialize { path: PathBuf, message: String },

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pre-flight check of a translation provider failed.
    #[error("{provider} is not configured correctly: {message}")]
    ProviderConfigurationInvalid { provider: String, message: String },

    /// The provider returned fewer (or different) translations than were requested.
    #[error(
        "Provider returned {received} of {expected} translations, missing: [{}]",
        .missing.join(", ")
    )]
    ProviderIncompleteResponse {
        expected: usize,
        received: usize,
        missing: Vec<String>,
    },

    #[error("{provider} request failed: {message}")]
    ProviderRequest { provider: String, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn conflict(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StructuralConflict {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn request(provider: &str, message: impl ToString) -> Self {
        Self::ProviderRequest {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }
}
