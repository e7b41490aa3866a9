//! Core types for GeoAI: the normalized conversation and result shapes.
//!
//! Every provider adapter consumes [`ConversationMessage`]s and the
//! orchestrator always hands back exactly one [`ResponseResult`]. Backend wire
//! formats never leak past these types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance label used when the answer came from the offline synthesizer.
pub const FALLBACK_PROVIDER: &str = "fallback";

// ─────────────────────────────────────────────
// Conversation messages
// ─────────────────────────────────────────────

/// Who authored a conversation message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat turn, owned by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    /// Marks an error bubble rendered by the caller. These never enter the
    /// context window sent to a provider.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_error: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl ConversationMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        ConversationMessage {
            role,
            content: content.into(),
            is_error: false,
        }
    }

    /// Mark this message as an error bubble.
    pub fn as_error(mut self) -> Self {
        self.is_error = true;
        self
    }
}

// ─────────────────────────────────────────────
// Attempts
// ─────────────────────────────────────────────

/// How a single outbound provider call ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    AuthenticationFailure,
    QuotaExceeded,
    TransientServerError,
    MalformedResponse,
    InvalidRequest,
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Succeeded)
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttemptOutcome::Succeeded => "succeeded",
            AttemptOutcome::AuthenticationFailure => "authentication failure",
            AttemptOutcome::QuotaExceeded => "quota exceeded",
            AttemptOutcome::TransientServerError => "transient server error",
            AttemptOutcome::MalformedResponse => "malformed response",
            AttemptOutcome::InvalidRequest => "invalid request",
        };
        f.write_str(s)
    }
}

/// One outbound call made while answering a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attempt {
    /// Canonical provider name (e.g. `"openai"`).
    pub provider: String,
    pub outcome: AttemptOutcome,
}

// ─────────────────────────────────────────────
// Response result
// ─────────────────────────────────────────────

/// The normalized answer handed back to the caller.
///
/// `provider_name` is either a configured provider's canonical name or
/// [`FALLBACK_PROVIDER`]; it is never empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseResult {
    pub text: String,
    pub provider_name: String,
    pub was_fallback: bool,
    /// Outbound calls in the order they were made (empty when no network
    /// call was attempted).
    pub attempts: Vec<Attempt>,
}

impl ResponseResult {
    /// A backend-sourced answer.
    pub fn from_provider(
        text: impl Into<String>,
        provider_name: impl Into<String>,
        attempts: Vec<Attempt>,
    ) -> Self {
        ResponseResult {
            text: text.into(),
            provider_name: provider_name.into(),
            was_fallback: false,
            attempts,
        }
    }

    /// An offline canned answer.
    pub fn fallback(text: impl Into<String>, attempts: Vec<Attempt>) -> Self {
        ResponseResult {
            text: text.into(),
            provider_name: FALLBACK_PROVIDER.to_string(),
            was_fallback: true,
            attempts,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
