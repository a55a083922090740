use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::Translator;
use super::llm::{self, LlmOutput};
use crate::config::OpenAiSettings;
use crate::core::{Error, Result, Translation, TranslationUnit};

const NAME: &str = "OpenAI";

/// Units per request when no concurrency hint is given.
const DEFAULT_CHUNK_SIZE: usize = 50;

pub struct OpenAiTranslator {
    client: Client,
    settings: OpenAiSettings,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiTranslator {
    pub fn new(settings: OpenAiSettings) -> Self {
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
            "messages": [
                {"role": "system", "content": llm::SYSTEM_PROMPT},
                {"role": "user", "content": llm::user_prompt(chunk)?},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "translations",
                    "strict": true,
                    "schema": llm::output_schema(),
                },
            },
        });

        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        debug!(%url, units = chunk.len(), "sending OpenAI request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key().unwrap_or_default())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::request(NAME, e))?;
        let response: ChatResponse = llm::check_status(NAME, response)
            .await?
            .json()
            .await
            .map_err(|e| Error::request(NAME, e))?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| Error::request(NAME, "response has no choices"))?;

        let content = match (message.content, message.refusal) {
            (Some(content), _) => content,
            (None, Some(refusal)) => {
                return Err(Error::request(NAME, format!("model refused: {}", refusal)));
            }
            (None, None) => return Err(Error::request(NAME, "response has no content")),
        };

        let output: LlmOutput = serde_json::from_str(&content)
            .map_err(|e| Error::request(NAME, format!("malformed structured output: {}", e)))?;
        llm::collect_output(NAME, chunk, output)
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn validate_configuration(&self) -> Result<()> {
        if self.api_key().is_none() {
            return Err(Error::ProviderConfigurationInvalid {
                provider: NAME.to_string(),
                message: "OPENAI_API_KEY is not set".to_string(),
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
