//! Adapter trait: the seam between the orchestrator and each backend.
//!
//! Every backend shape (OpenAI, Gemini, Claude, Cohere) implements
//! [`ChatAdapter`]. Adapters make exactly one outbound call per `complete` and
//! never retry; ordering and retry policy live in the orchestrator.

use async_trait::async_trait;
use geoai_core::types::{ConversationMessage, Role};

use crate::error::ProviderError;

/// Generation parameters passed to each call.
#[derive(Clone, Debug)]
pub struct GenerationParams {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 800,
            temperature: 0.7,
        }
    }
}

/// A normalized request, already bounded by the orchestrator.
#[derive(Clone, Copy, Debug)]
pub struct CompletionRequest<'a> {
    /// Fixed system instruction.
    pub system: &'a str,
    /// Trailing conversation window, oldest first.
    pub messages: &'a [ConversationMessage],
    pub params: &'a GenerationParams,
}

impl CompletionRequest<'_> {
    /// Render the request as one prompt: system instruction, a role-prefixed
    /// transcript, then `cue` to invite the model's turn.
    ///
    /// Used by backends that take a single prompt instead of a message array.
    pub fn transcript_prompt(&self, label: fn(Role) -> &'static str, cue: &str) -> String {
        let transcript = self
            .messages
            .iter()
            .map(|m| format!("{}: {}", label(m.role), m.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        if transcript.is_empty() {
            format!("{}\n\n{}", self.system, cue)
        } else {
            format!("{}\n\n{}\n\n{}", self.system, transcript, cue)
        }
    }
}

/// Trait that every provider adapter implements.
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Send one request and return the backend's text.
    ///
    /// Blank text is reported as [`ProviderError::MalformedResponse`], never
    /// as an empty success.
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ProviderError>;

    /// Canonical provider name (e.g. `"gemini"`).
    fn provider_name(&self) -> &str;
}
