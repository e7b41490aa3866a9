//! Shared HTTP plumbing for the adapters, plus the shape → adapter factory.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::anthropic::ClaudeAdapter;
use crate::cohere::CohereAdapter;
use crate::error::ProviderError;
use crate::gemini::GeminiAdapter;
use crate::openai::OpenAiAdapter;
use crate::registry::{RequestShape, ResolvedProvider};
use crate::traits::ChatAdapter;

/// Build the pooled HTTP client shared by every adapter.
///
/// `timeout` bounds each request end to end.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .build()
}

/// Create the adapter for an available provider.
///
/// Returns `None` when the provider has no credential.
pub fn create_adapter(
    provider: &ResolvedProvider,
    client: reqwest::Client,
) -> Option<Arc<dyn ChatAdapter>> {
    let credential = provider.credential()?.clone();
    let endpoint = provider.endpoint.clone();
    let model = provider.model.clone();

    debug!(
        provider = provider.name(),
        shape = ?provider.shape(),
        endpoint = %endpoint,
        model = %model,
        "Creating adapter"
    );

    let adapter: Arc<dyn ChatAdapter> = match provider.shape() {
        RequestShape::OpenAi => Arc::new(OpenAiAdapter::new(client, endpoint, credential, model)),
        RequestShape::Gemini => Arc::new(GeminiAdapter::new(client, endpoint, credential, model)),
        RequestShape::Claude => Arc::new(ClaudeAdapter::new(client, endpoint, credential, model)),
        RequestShape::Cohere => Arc::new(CohereAdapter::new(client, endpoint, credential, model)),
    };
    Some(adapter)
}

/// Send a prepared request and decode a JSON success body.
///
/// Non-2xx statuses are classified by [`ProviderError::from_status`]; bodies
/// that fail to decode become [`ProviderError::MalformedResponse`].
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!(provider, error = %e, "HTTP request failed");
            return Err(e.into());
        }
    };

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        let err = ProviderError::from_status(status, &body);
        error!(provider, status = %status, error = %err, "API error");
        return Err(err);
    }

    let bytes = response.bytes().await.map_err(|e| {
        error!(provider, error = %e, "Failed to read response body");
        ProviderError::from(e)
    })?;

    serde_json::from_slice::<T>(&bytes).map_err(|e| {
        error!(provider, error = %e, "Failed to parse response");
        ProviderError::MalformedResponse(format!("invalid JSON body: {e}"))
    })
}

/// Reject missing or blank text; a blank answer is a failure, not a success.
pub(crate) fn require_text(text: Option<String>, what: &str) -> Result<String, ProviderError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        Some(_) => Err(ProviderError::MalformedResponse(format!("empty {what}"))),
        None => Err(ProviderError::MalformedResponse(format!("missing {what}"))),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
