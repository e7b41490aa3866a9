//! Provider error taxonomy.
//!
//! Every adapter failure lands in exactly one variant so the orchestrator can
//! decide what to do next without string matching.

use geoai_core::types::AttemptOutcome;
use geoai_core::utils::{collapse_whitespace, truncate_string};
use reqwest::StatusCode;

/// Longest backend error message kept in an error value.
const MAX_ERROR_MESSAGE: usize = 200;

/// Errors returned by a single adapter call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Missing, invalid, or revoked credential. Never retried.
    #[error("authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },

    /// Rate limit or billing quota hit.
    #[error("quota exceeded ({status}): {message}")]
    QuotaExceeded { status: u16, message: String },

    /// Server-side or network failure that may succeed on another attempt.
    #[error("transient error{}: {message}", fmt_status(.status))]
    Transient { status: Option<u16>, message: String },

    /// The backend answered 2xx but the body was unusable or empty.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The backend rejected the request itself (unknown model, bad payload).
    #[error("request rejected ({status}): {message}")]
    InvalidRequest { status: u16, message: String },
}

impl ProviderError {
    /// Classify a non-success HTTP status and its body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let code = status.as_u16();
        let message = extract_error_message(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

        match code {
            401 | 403 => ProviderError::Authentication { status: code, message },
            // Gemini reports a bad key as 400 INVALID_ARGUMENT.
            400 if body.contains("API_KEY_INVALID") => {
                ProviderError::Authentication { status: code, message }
            }
            402 | 429 => ProviderError::QuotaExceeded { status: code, message },
            408 => ProviderError::Transient { status: Some(code), message },
            500..=599 => ProviderError::Transient { status: Some(code), message },
            _ => ProviderError::InvalidRequest { status: code, message },
        }
    }

    /// Build a transient error for a timed-out attempt.
    pub fn timeout(after: std::time::Duration) -> Self {
        ProviderError::Transient {
            status: None,
            message: format!("no response within {}s", after.as_secs_f32()),
        }
    }

    /// The attempt outcome recorded for this failure.
    pub fn outcome(&self) -> AttemptOutcome {
        match self {
            ProviderError::Authentication { .. } => AttemptOutcome::AuthenticationFailure,
            ProviderError::QuotaExceeded { .. } => AttemptOutcome::QuotaExceeded,
            ProviderError::Transient { .. } => AttemptOutcome::TransientServerError,
            ProviderError::MalformedResponse(_) => AttemptOutcome::MalformedResponse,
            ProviderError::InvalidRequest { .. } => AttemptOutcome::InvalidRequest,
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Transient { .. })
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ProviderError::MalformedResponse(err.to_string());
        }
        // Keys never travel in URLs, so reqwest's message is safe to keep.
        ProviderError::Transient {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

/// Pull a human-readable message out of a backend error body.
///
/// Understands `{"error": {"message": …}}` (OpenAI, Gemini, Anthropic),
/// `{"error": "…"}` and `{"message": …}` (Cohere). Falls back to the raw body.
fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let message = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(json) => json
            .pointer("/error/message")
            .or_else(|| json.get("message"))
            .or_else(|| json.get("error"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string()),
        Err(_) => trimmed.to_string(),
    };

    Some(truncate_string(&collapse_whitespace(&message), MAX_ERROR_MESSAGE))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
