//! Reqwest-backed adapter for the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{AssistError, Drafter, ReplySuggester, Transcriber};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DRAFT_MODEL: &str = "gemini-2.5-pro";
const FAST_MODEL: &str = "gemini-2.5-flash";
const TRANSCRIBE_INSTRUCTION: &str =
    "Transcribe this audio clip to plain text. Return only the transcript.";

pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, AssistError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), timeout)
    }

    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, AssistError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn generate(&self, model: &str, body: &GenerateRequest) -> Result<String, AssistError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(AssistError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        parse_text(&bytes)
    }
}

#[async_trait]
impl Drafter for GeminiClient {
    async fn draft(&self, prompt: &str) -> Result<String, AssistError> {
        self.generate(DRAFT_MODEL, &GenerateRequest::text(prompt)).await
    }
}

#[async_trait]
impl ReplySuggester for GeminiClient {
    async fn suggest(&self, transcript: &str) -> Result<Vec<String>, AssistError> {
        let mut request = GenerateRequest::text(transcript);
        request.generation_config = Some(json!({
            "responseMimeType": "application/json",
            "responseSchema": { "type": "ARRAY", "items": { "type": "STRING" } }
        }));
        let text = self.generate(FAST_MODEL, &request).await?;
        parse_string_array(&text)
    }
}

#[async_trait]
impl Transcriber for GeminiClient {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, AssistError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: B64.encode(audio),
                        },
                    },
                    Part::Text {
                        text: TRANSCRIBE_INSTRUCTION.to_string(),
                    },
                ],
            }],
            generation_config: None,
        };
        self.generate(FAST_MODEL, &request).await
    }
}

// -- Wire types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

impl GenerateRequest {
    fn text(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::Text {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Concatenate the text parts of the first candidate.
fn parse_text(body: &[u8]) -> Result<String, AssistError> {
    let decoded: GenerateResponse = serde_json::from_slice(body)
        .map_err(|e| AssistError::Decode(format!("invalid generateContent payload: {e}")))?;

    let text: String = decoded
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| match part {
                    Part::Text { text } => Some(text),
                    Part::InlineData { .. } => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AssistError::Decode("response contained no text".into()));
    }
    Ok(text)
}

fn parse_string_array(text: &str) -> Result<Vec<String>, AssistError> {
    serde_json::from_str::<Vec<String>>(text.trim())
        .map_err(|e| AssistError::Decode(format!("expected a JSON array of strings: {e}")))
}
