//! Translation providers.
//!
//! The reconciliation engine only sees the [`Translator`] capability. Three
//! backends implement it:
//!
//! - `aws`: Amazon Translate, one request per unit, bounded parallel batches
//! - `openai`: OpenAI chat completions with a JSON schema response
//! - `anthropic`: Anthropic messages API with a forced tool call
//!
//! Provider settings (models, endpoints, credentials) are passed in
//! explicitly; no backend reads process environment on its own.

mod anthropic;
mod aws;
mod batch;
mod llm;
mod openai;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use anthropic::AnthropicTranslator;
pub use aws::AwsTranslator;
pub use batch::in_batches;
pub use openai::OpenAiTranslator;

use crate::config::ProviderSettings;
use crate::core::{Result, Translation, TranslationUnit};

#[async_trait]
pub trait Translator: Send + Sync {
    /// Human readable provider name used in messages.
    fn name(&self) -> &'static str;

    /// Pre-flight check run once before any translation work.
    async fn validate_configuration(&self) -> Result<()>;

    /// Translate every unit. Implementations must return exactly one
    /// translation per unit; `concurrency` is a batch-size hint.
    async fn translate(
        &self,
        units: &[TranslationUnit],
        concurrency: Option<usize>,
    ) -> Result<Vec<Translation>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Aws,
    #[value(name = "openai")]
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Aws => write!(f, "AWS"),
            Provider::OpenAi => write!(f, "OpenAI"),
            Provider::Anthropic => write!(f, "Anthropic"),
        }
    }
}

/// Build the translator for `provider` from explicit settings.
pub async fn connect(provider: Provider, settings: &ProviderSettings) -> Box<dyn Translator> {
    match provider {
        Provider::Aws => Box::new(AwsTranslator::connect(&settings.aws).await),
        Provider::OpenAi => Box::new(OpenAiTranslator::new(settings.openai.clone())),
        Provider::Anthropic => Box::new(AnthropicTranslator::new(settings.anthropic.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        assert_eq!(Provider::Aws.to_string(), "AWS");
        assert_eq!(Provider::OpenAi.to_string(), "OpenAI");
        assert_eq!(Provider::Anthropic.to_string(), "Anthropic");
    }

    #[test]
    fn test_provider_value_names() {
        assert_eq!(Provider::from_str("openai", true), Ok(Provider::OpenAi));
        assert_eq!(Provider::from_str("AWS", true), Ok(Provider::Aws));
        assert!(Provider::from_str("deepl", true).is_err());
    }

    #[test]
    fn test_provider_deserialize() {
        let provider: Provider = serde_json::from_str(r#""openai""#).unwrap();
        assert_eq!(provider, Provider::OpenAi);
        let provider: Provider = serde_json::from_str(r#""anthropic""#).unwrap();
        assert_eq!(provider, Provider::Anthropic);
    }
}
