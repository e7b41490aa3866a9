//! Gemini-shaped adapter: `models/{model}:generateContent` with one prompt.
//!
//! The key goes in the `x-goog-api-key` header rather than the `?key=` query
//! parameter so it never shows up in URLs or transport error messages.

use async_trait::async_trait;
use geoai_core::types::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use crate::http::{require_text, send_json};
use crate::registry::Credential;
use crate::traits::{ChatAdapter, CompletionRequest};

const PROVIDER: &str = "gemini";

pub struct GeminiAdapter {
    client: reqwest::Client,
    api_base: String,
    api_key: Credential,
    model: String,
}

impl std::fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiAdapter {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        api_key: Credential,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_key,
            model: model.into(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

fn label(role: Role) -> &'static str {
    role.as_str()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[async_trait]
impl ChatAdapter for GeminiAdapter {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(request.transcript_prompt(label, "assistant:")),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.params.temperature,
                max_output_tokens: request.params.max_tokens,
            },
        };

        debug!(
            provider = PROVIDER,
            model = %self.model,
            messages = request.messages.len(),
            "Calling Gemini"
        );

        let response: GenerateResponse = send_json(
            PROVIDER,
            self.client
                .post(self.generate_url())
                .header("x-goog-api-key", self.api_key.expose())
                .json(&body),
        )
        .await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text);
        require_text(text, "candidates[0].content.parts[0].text")
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
