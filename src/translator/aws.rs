use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_translate::{Client, error::DisplayErrorContext};
use tracing::{debug, warn};

use super::{Translator, in_batches};
use crate::config::AwsSettings;
use crate::core::{Error, Result, Translation, TranslationUnit};

const NAME: &str = "AWS";

/// Amazon Translate accepts at most this many requests in flight per batch.
pub const MAX_CONCURRENCY: usize = 20;

pub struct AwsTranslator {
    client: Client,
}

impl AwsTranslator {
    /// Resolve credentials and region through the SDK default chain,
    /// overridden by the explicit settings.
    pub async fn connect(settings: &AwsSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;
        Self {
            client: Client::new(&config),
        }
    }

    async fn translate_unit(&self, unit: &TranslationUnit) -> Result<Translation> {
        let output = self
            .client
            .translate_text()
            .text(&unit.source_text)
            .source_language_code(&unit.source_locale)
            .target_language_code(&unit.target_locale)
            .send()
            .await
            .map_err(|e| Error::request(NAME, DisplayErrorContext(&e)))?;
        Ok(Translation::new(unit.clone(), output.translated_text()))
    }
}

/// Clamp a concurrency hint to what Amazon Translate allows.
fn batch_size(concurrency: Option<usize>) -> usize {
    match concurrency {
        Some(n) if n > MAX_CONCURRENCY => {
            warn!(
                requested = n,
                "AWS Translate does not support concurrency greater than {}, using {}",
                MAX_CONCURRENCY,
                MAX_CONCURRENCY
            );
            MAX_CONCURRENCY
        }
        Some(n) => n.max(1),
        None => MAX_CONCURRENCY,
    }
}

#[async_trait]
impl Translator for AwsTranslator {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn validate_configuration(&self) -> Result<()> {
        self.client
            .list_languages()
            .send()
            .await
            .map(|_| ())
            .map_err(|e| Error::ProviderConfigurationInvalid {
                provider: NAME.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })
    }

    async fn translate(
        &self,
        units: &[TranslationUnit],
        concurrency: Option<usize>,
    ) -> Result<Vec<Translation>> {
        let batch = batch_size(concurrency);
        debug!(units = units.len(), batch, "translating with AWS");
        in_batches(units, batch, |unit| self.translate_unit(unit)).await
    }
}
