//! Cohere-shaped adapter: `/generate` with a raw role-prefixed prompt.

use async_trait::async_trait;
use geoai_core::types::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use crate::http::{require_text, send_json};
use crate::registry::Credential;
use crate::traits::{ChatAdapter, CompletionRequest};

const PROVIDER: &str = "cohere";

/// Stop before the model starts writing the next turn itself.
const STOP_SEQUENCES: &[&str] = &["user:", "system:"];

pub struct CohereAdapter {
    client: reqwest::Client,
    api_base: String,
    api_key: Credential,
    model: String,
}

impl std::fmt::Debug for CohereAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohereAdapter")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl CohereAdapter {
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
        format!("{}/generate", self.api_base.trim_end_matches('/'))
    }
}

fn label(role: Role) -> &'static str {
    role.as_str()
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
    temperature: f64,
    stop_sequences: &'static [&'static str],
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generations: Vec<Generation>,
}

#[derive(Deserialize)]
struct Generation {
    text: Option<String>,
}

#[async_trait]
impl ChatAdapter for CohereAdapter {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: request.transcript_prompt(label, "response:"),
            max_tokens: request.params.max_tokens,
            temperature: request.params.temperature,
            stop_sequences: STOP_SEQUENCES,
        };

        debug!(
            provider = PROVIDER,
            model = %self.model,
            messages = request.messages.len(),
            "Calling Cohere"
        );

        let response: GenerateResponse = send_json(
            PROVIDER,
            self.client
                .post(self.generate_url())
                .bearer_auth(self.api_key.expose())
                .json(&body),
        )
        .await?;

        let text = response
            .generations
            .into_iter()
            .next()
            .and_then(|g| g.text)
            .map(|t| t.trim().to_string());
        require_text(text, "generations[0].text")
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
