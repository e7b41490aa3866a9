//! Claude-shaped adapter: `/messages` carrying one `Human:`/`Assistant:`
//! transcript as a single user turn.

use async_trait::async_trait;
use geoai_core::types::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use crate::http::{require_text, send_json};
use crate::registry::Credential;
use crate::traits::{ChatAdapter, CompletionRequest};

const PROVIDER: &str = "anthropic";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct ClaudeAdapter {
    client: reqwest::Client,
    api_base: String,
    api_key: Credential,
    model: String,
}

impl std::fmt::Debug for ClaudeAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeAdapter")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl ClaudeAdapter {
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

    fn messages_url(&self) -> String {
        format!("{}/messages", self.api_base.trim_end_matches('/'))
    }
}

fn label(role: Role) -> &'static str {
    match role {
        Role::User => "Human",
        Role::Assistant | Role::System => "Assistant",
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: [WireMessage; 1],
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl ChatAdapter for ClaudeAdapter {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.params.max_tokens,
            temperature: request.params.temperature,
            messages: [WireMessage {
                role: "user",
                content: request.transcript_prompt(label, "Assistant:"),
            }],
        };

        debug!(
            provider = PROVIDER,
            model = %self.model,
            messages = request.messages.len(),
            "Calling Claude"
        );

        let response: MessagesResponse = send_json(
            PROVIDER,
            self.client
                .post(self.messages_url())
                .header("x-api-key", self.api_key.expose())
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body),
        )
        .await?;

        let text = response
            .content
            .into_iter()
            .find(|block| block.kind == "text" || block.kind.is_empty())
            .and_then(|block| block.text);
        require_text(text, "content[0].text")
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
