//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig`, `OrchestratorConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.geoai/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub orchestrator: OrchestratorConfig,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// User-supplied settings for a single backend (API key, base URL, model).
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication. Empty means "not configured".
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides the provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Model override (otherwise the provider default is used).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ProviderConfig {
    /// Whether this provider has a usable API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// Keys stay out of Debug output.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &if self.is_configured() { "<set>" } else { "<empty>" })
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

/// All provider configurations, one per supported backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
    #[serde(default)]
    pub anthropic: ProviderConfig,
    #[serde(default)]
    pub cohere: ProviderConfig,
}

impl ProvidersConfig {
    /// Get a provider config by canonical name (e.g. `"anthropic"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "openai" => Some(&self.openai),
            "gemini" => Some(&self.gemini),
            "anthropic" => Some(&self.anthropic),
            "cohere" => Some(&self.cohere),
            _ => None,
        }
    }

    /// Mutable lookup by canonical name, used by the env override pass.
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        match name {
            "openai" => Some(&mut self.openai),
            "gemini" => Some(&mut self.gemini),
            "anthropic" => Some(&mut self.anthropic),
            "cohere" => Some(&mut self.cohere),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────
// Orchestrator
// ─────────────────────────────────────────────

/// Generation parameters and fallback-chain policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrchestratorConfig {
    /// Maximum tokens to generate per response.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Trailing history messages kept in addition to the new user turn.
    pub context_messages: usize,
    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
    /// Extra attempts on the same provider after a transient failure (0 or 1).
    pub transient_retries: u8,
    /// Provider tried first when available (canonical name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_provider: Option<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_tokens: 800,
            temperature: 0.7,
            context_messages: 10,
            timeout_secs: 30,
            transient_retries: 0,
            preferred_provider: None,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
