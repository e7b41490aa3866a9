//! OpenAI-shaped adapter: `/chat/completions` with a message array.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use crate::http::{require_text, send_json};
use crate::registry::Credential;
use crate::traits::{ChatAdapter, CompletionRequest};

const PROVIDER: &str = "openai";

pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_base: String,
    api_key: Credential,
    model: String,
}

impl std::fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAdapter")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiAdapter {
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

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatAdapter for OpenAiAdapter {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ProviderError> {
        let messages = std::iter::once(WireMessage {
            role: "system",
            content: request.system,
        })
        .chain(request.messages.iter().map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        }))
        .collect();

        let body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: request.params.max_tokens,
            temperature: request.params.temperature,
        };

        debug!(
            provider = PROVIDER,
            model = %self.model,
            messages = request.messages.len(),
            "Calling OpenAI"
        );

        let response: ChatResponse = send_json(
            PROVIDER,
            self.client
                .post(self.completions_url())
                .bearer_auth(self.api_key.expose())
                .json(&body),
        )
        .await?;

        let content = response.choices.into_iter().next().and_then(|c| c.message.content);
        require_text(content, "choices[0].message.content")
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::GenerationParams;
    use geoai_core::types::ConversationMessage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(base: &str) -> OpenAiAdapter {
        OpenAiAdapter::new(
            reqwest::Client::new(),
            base,
            Credential::new("test-key-123").unwrap(),
            "gpt-4o",
        )
    }

    #[test]
    fn test_completions_url_trailing_slash() {
        assert_eq!(
            adapter("https://api.openai.com/v1/").completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        assert!(!format!("{:?}", adapter("http://x")).contains("test-key-123"));
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o",
                "max_tokens": 800,
                "temperature": 0.7,
                "messages": [
                    {"role": "system", "content": "SYS"},
                    {"role": "user", "content": "Taiwan?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-test",
                "choices": [{
                    "message": {"role": "assistant", "content": "Strait tensions remain high."},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let messages = vec![ConversationMessage::user("Taiwan?")];
        let params = GenerationParams::default();
        let request = CompletionRequest {
            system: "SYS",
            messages: &messages,
            params: &params,
        };

        let text = adapter(&mock_server.uri()).complete(&request).await.unwrap();
        assert_eq!(text, "Strait tensions remain high.");
    }

    #[tokio::test]
    async fn test_complete_quota_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"message": "Rate limit exceeded", "type": "rate_limit_error"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let params = GenerationParams::default();
        let messages = vec![ConversationMessage::user("Hello")];
        let request = CompletionRequest {
            system: "SYS",
            messages: &messages,
            params: &params,
        };

        let err = adapter(&mock_server.uri()).complete(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::QuotaExceeded { status: 429, .. }));
        assert!(err.to_string().contains("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_complete_null_content_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": null}}]
            })))
            .mount(&mock_server)
            .await;

        let params = GenerationParams::default();
        let messages = vec![ConversationMessage::user("Hello")];
        let request = CompletionRequest {
            system: "SYS",
            messages: &messages,
            params: &params,
        };

        let err = adapter(&mock_server.uri()).complete(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_complete_empty_choices_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&mock_server)
            .await;

        let params = GenerationParams::default();
        let request = CompletionRequest {
            system: "SYS",
            messages: &[],
            params: &params,
        };

        let err = adapter(&mock_server.uri()).complete(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_complete_network_error_is_transient() {
        // Nothing listens on port 1
        let params = GenerationParams::default();
        let request = CompletionRequest {
            system: "SYS",
            messages: &[],
            params: &params,
        };

        let err = adapter("http://127.0.0.1:1").complete(&request).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
