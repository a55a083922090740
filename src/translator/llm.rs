//! Prompt and response handling shared by the LLM-backed providers.
//!
//! Units of one chunk are sent as a JSON array. Each item carries a short id
//! (its position in the chunk) so the answer can be mapped back without
//! relying on the model to echo keys verbatim.

use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::core::{Error, Result, Translation, TranslationUnit};

pub const SYSTEM_PROMPT: &str = "\
Your goal is to help the user translate text in their project which uses i18next.

The user will provide you multiple text entries to translate. The text will be provided \
inside a JSON array. Each object includes the source locale, the target locale, the text \
to translate and a unique id.

In the output you must map each id to the translation you generate. Every id from the \
input must appear exactly once in the output.

Translation strings may contain placeholders like {{name}} or {{age}} which must be kept \
in the translated text exactly as written, without translating the label in the braces.";

#[derive(Debug, Serialize)]
struct PromptItem<'a> {
    id: String,
    #[serde(flatten)]
    unit: &'a TranslationUnit,
}

#[derive(Debug, Deserialize)]
pub struct LlmOutput {
    pub output: Vec<LlmOutputItem>,
}

#[derive(Debug, Deserialize)]
pub struct LlmOutputItem {
    pub id: String,
    pub value: String,
}

pub fn user_prompt(chunk: &[TranslationUnit]) -> Result<String> {
    let items: Vec<PromptItem> = chunk
        .iter()
        .enumerate()
        .map(|(i, unit)| PromptItem {
            id: i.to_string(),
            unit,
        })
        .collect();
    let payload = serde_json::to_string_pretty(&items)
        .map_err(|e| Error::request("prompt", format!("failed to encode units: {}", e)))?;
    Ok(format!("Translate the following:\n'''\n{}\n'''\n", payload))
}

/// JSON schema of [`LlmOutput`], used for structured output / tool input.
pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "output": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string", "description": "Source id"},
                        "value": {"type": "string", "description": "Translated text"}
                    },
                    "required": ["id", "value"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["output"],
        "additionalProperties": false
    })
}

/// Map model output back onto the units of `chunk`.
///
/// Ids that do not belong to the chunk are rejected; ids the model skipped
/// surface later as an incomplete response.
pub fn collect_output(
    provider: &str,
    chunk: &[TranslationUnit],
    output: LlmOutput,
) -> Result<Vec<Translation>> {
    output
        .output
        .into_iter()
        .map(|item| {
            let unit = item
                .id
                .parse::<usize>()
                .ok()
                .and_then(|i| chunk.get(i))
                .ok_or_else(|| {
                    Error::request(
                        provider,
                        format!("response references unknown unit id \"{}\"", item.id),
                    )
                })?;
            Ok(Translation::new(unit.clone(), item.value))
        })
        .collect()
}

/// Fail with the response body when the provider answered with an error status.
pub async fn check_status(provider: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::request(provider, format!("HTTP {}: {}", status, body.trim())))
}
