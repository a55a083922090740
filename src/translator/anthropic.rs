use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::Translator;
use super::llm::{self, LlmOutput};
use crate::config::AnthropicSettings;
use crate::core::{Error, Result, Translation, TranslationUnit};

const NAME: &str = "Anthropic";
const API_VERSION: &str = "2023-06-01";
const TOOL_NAME: &str = "record_translations";

/// Units per request when no concurrency hint is given.
const DEFAULT_CHUNK_SIZE: usize = 100;

pub struct AnthropicTranslator {
    client: Client,
    settings: AnthropicSettings,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    ToolUse { name: String, input: Value },
    #[serde(other)]
    Other,
}

impl AnthropicTranslator {
    pub fn new(settings: AnthropicSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.settings.api_key.as_deref().filter(|k| !k.is_empty())
    }

    async fn translate_chunk(&self, chunk: &[TranslationUnit]) -> Result<Vec<Translation>> {
        let body = json!({
            "model": self.settings.model,
            "max_tokens": self.settings.max_tokens,
            "system": llm::SYSTEM_PROMPT,
            "messages": [
                {"role": "user", "content": llm::user_prompt(chunk)?},
            ],
            "tools": [{
                "name": TOOL_NAME,
                "description": "Record the translation of every input entry by id.",
                "input_schema": llm::output_schema(),
            }],
            "tool_choice": {"type": "tool", "name": TOOL_NAME},
        });

        let url = format!("{}/v1/messages", self.settings.base_url.trim_end_matches('/'));
        debug!(%url, units = chunk.len(), "sending Anthropic request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key().unwrap_or_default())
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::request(NAME, e))?;
        let response: MessagesResponse = llm::check_status(NAME, response)
            .await?
            .json()
            .await
            .map_err(|e| Error::request(NAME, e))?;

        let input = response
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::ToolUse { name, input } if name == TOOL_NAME => Some(input),
                _ => None,
            })
            .ok_or_else(|| {
                Error::request(
                    NAME,
                    format!(
                        "response has no {} tool call (stop reason: {})",
                        TOOL_NAME,
                        response.stop_reason.as_deref().unwrap_or("unknown")
                    ),
                )
            })?;

        let output: LlmOutput = serde_json::from_value(input)
            .map_err(|e| Error::request(NAME, format!("malformed tool input: {}", e)))?;
        llm::collect_output(NAME, chunk, output)
    }
}

#[async_trait]
impl Translator for AnthropicTranslator {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn validate_configuration(&self) -> Result<()> {
        if self.api_key().is_none() {
            return Err(Error::ProviderConfigurationInvalid {
                provider: NAME.to_string(),
                message: "ANTHROPIC_API_KEY is not set".to_string(),
            });
        }
        Ok(())
    }

    async fn translate(
        &self,
        units: &[TranslationUnit],
        concurrency: Option<usize>,
    ) -> Result<Vec<Translation>> {
        let chunk_size = concurrency.unwrap_or(DEFAULT_CHUNK_SIZE).max(1);
        let mut translations = Vec::with_capacity(units.len());
        for chunk in units.chunks(chunk_size) {
            translations.extend(self.translate_chunk(chunk).await?);
        }
        Ok(translations)
    }
}
