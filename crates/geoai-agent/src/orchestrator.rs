//! Orchestrator: tries the configured providers one after another and always
//! hands back exactly one [`ResponseResult`].
//!
//! Flow for one request:
//! 1. No user text, or no available provider → offline analysis, no network.
//! 2. Build the bounded context window once.
//! 3. Walk `registry.attempt_order(preferred)`; each attempt is bounded by a
//!    timeout and may be retried once on a transient failure.
//! 4. First success wins. When every provider has failed, fall back to the
//!    offline analysis for the latest user message.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use geoai_core::config::{Config, OrchestratorConfig};
use geoai_core::types::{Attempt, AttemptOutcome, ConversationMessage, ResponseResult};
use geoai_providers::{
    build_client, create_adapter, ChatAdapter, CompletionRequest, GenerationParams, ProviderError,
    ProviderRegistry,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::context::{build_window, SYSTEM_PROMPT};
use crate::fallback::{latest_user_text, synthesize};

// ─────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────

/// Runtime policy derived from [`OrchestratorConfig`].
#[derive(Clone, Debug)]
pub struct OrchestratorSettings {
    pub params: GenerationParams,
    /// History messages kept ahead of the new user turn.
    pub context_messages: usize,
    /// Upper bound on a single provider call.
    pub attempt_timeout: Duration,
    /// Extra attempts on the same provider after a transient failure (0 or 1).
    pub transient_retries: u8,
    /// Used when the caller passes no preference.
    pub preferred_provider: Option<String>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&OrchestratorConfig::default())
    }
}

impl From<&OrchestratorConfig> for OrchestratorSettings {
    fn from(config: &OrchestratorConfig) -> Self {
        Self {
            params: GenerationParams {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
            context_messages: config.context_messages,
            attempt_timeout: Duration::from_secs(config.timeout_secs.max(1)),
            transient_retries: config.transient_retries.min(1),
            preferred_provider: config
                .preferred_provider
                .clone()
                .filter(|p| !p.trim().is_empty()),
        }
    }
}

// ─────────────────────────────────────────────
// Orchestrator
// ─────────────────────────────────────────────

pub struct Orchestrator {
    registry: Arc<ProviderRegistry>,
    /// Adapters keyed by canonical provider name.
    adapters: HashMap<String, Arc<dyn ChatAdapter>>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    /// Assemble an orchestrator from explicit parts.
    ///
    /// Each adapter is matched to a registry entry by its `provider_name()`.
    pub fn new(
        registry: Arc<ProviderRegistry>,
        adapters: Vec<Arc<dyn ChatAdapter>>,
        settings: OrchestratorSettings,
    ) -> Self {
        let adapters = adapters
            .into_iter()
            .map(|a| (a.provider_name().to_string(), a))
            .collect();
        Self {
            registry,
            adapters,
            settings,
        }
    }

    /// Build the registry, one shared HTTP client, and an adapter for every
    /// available provider.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let settings = OrchestratorSettings::from(&config.orchestrator);
        let registry = Arc::new(ProviderRegistry::from_config(&config.providers));
        let client = build_client(settings.attempt_timeout)?;

        let adapters = registry
            .available()
            .filter_map(|p| create_adapter(p, client.clone()))
            .collect();

        Ok(Self::new(registry, adapters, settings))
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Answer the conversation. Never fails: every error path ends in an
    /// offline analysis tagged as fallback.
    ///
    /// `preferred` is an exact canonical provider name; when `None` the
    /// configured preference (if any) applies.
    pub async fn get_response(
        &self,
        messages: &[ConversationMessage],
        preferred: Option<&str>,
    ) -> ResponseResult {
        let Some(user_text) = latest_user_text(messages) else {
            info!("no user message in conversation, using offline analysis");
            return ResponseResult::fallback(synthesize(""), Vec::new());
        };

        if !self.registry.has_any_available() {
            warn!("no AI providers configured, using offline analysis");
            return ResponseResult::fallback(synthesize(user_text), Vec::new());
        }

        let preferred = preferred.or(self.settings.preferred_provider.as_deref());
        let order: Vec<&str> = self
            .registry
            .attempt_order(preferred)
            .into_iter()
            .map(|p| p.name())
            .filter(|name| self.adapters.contains_key(*name))
            .collect();

        if order.is_empty() {
            warn!("no adapter for any available provider, using offline analysis");
            return ResponseResult::fallback(synthesize(user_text), Vec::new());
        }

        let window = build_window(messages, self.settings.context_messages);
        let request = CompletionRequest {
            system: SYSTEM_PROMPT,
            messages: &window,
            params: &self.settings.params,
        };

        let mut attempts = Vec::new();
        for name in order {
            let Some(adapter) = self.adapters.get(name) else {
                continue;
            };

            let mut retries_left = self.settings.transient_retries;
            loop {
                debug!(provider = name, attempt = attempts.len() + 1, "calling provider");
                match self.attempt(adapter.as_ref(), &request).await {
                    Ok(text) => {
                        attempts.push(Attempt {
                            provider: name.to_string(),
                            outcome: AttemptOutcome::Succeeded,
                        });
                        info!(provider = name, attempts = attempts.len(), "response received");
                        return ResponseResult::from_provider(text, name, attempts);
                    }
                    Err(e) => {
                        attempts.push(Attempt {
                            provider: name.to_string(),
                            outcome: e.outcome(),
                        });
                        warn!(provider = name, kind = %e.outcome(), error = %e, "provider failed");

                        if e.is_retryable() && retries_left > 0 {
                            retries_left -= 1;
                            debug!(provider = name, "retrying after transient failure");
                            continue;
                        }
                        break;
                    }
                }
            }
        }

        warn!(
            attempts = attempts.len(),
            "all AI providers exhausted, using offline analysis"
        );
        ResponseResult::fallback(synthesize(user_text), attempts)
    }

    /// Like [`get_response`](Self::get_response), but gives up as soon as
    /// `cancel` fires. The in-flight call is dropped and `None` is returned.
    pub async fn get_response_cancellable(
        &self,
        messages: &[ConversationMessage],
        preferred: Option<&str>,
        cancel: &CancellationToken,
    ) -> Option<ResponseResult> {
        if cancel.is_cancelled() {
            info!("request cancelled before start");
            return None;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("request cancelled");
                None
            }
            result = self.get_response(messages, preferred) => Some(result),
        }
    }

    /// One bounded call. A timeout counts as a transient failure.
    async fn attempt(
        &self,
        adapter: &dyn ChatAdapter,
        request: &CompletionRequest<'_>,
    ) -> Result<String, ProviderError> {
        let limit = self.settings.attempt_timeout;
        let text = tokio::time::timeout(limit, adapter.complete(request))
            .await
            .unwrap_or_else(|_| Err(ProviderError::timeout(limit)))?;

        if text.trim().is_empty() {
            return Err(ProviderError::MalformedResponse("empty text".into()));
        }
        Ok(text)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
