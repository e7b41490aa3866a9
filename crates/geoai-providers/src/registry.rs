//! Provider registry: static specs for the four supported backends, joined
//! with the user's configuration once at startup.
//!
//! The registry is immutable after construction. Availability is derived from
//! whether a credential is present; a missing key is never an error.

use std::fmt;

use geoai_core::config::{ProviderConfig, ProvidersConfig};
use serde::Serialize;
use tracing::{debug, info};

// ─────────────────────────────────────────────
// ProviderSpec: static metadata for one provider
// ─────────────────────────────────────────────

/// Which wire format an adapter speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestShape {
    /// Chat-completions message array.
    OpenAi,
    /// Single prompt with a `generationConfig` block.
    Gemini,
    /// Single role-prefixed transcript sent as one user message.
    Claude,
    /// Single role-prefixed transcript sent as a raw prompt.
    Cohere,
}

/// Static specification describing one backend.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Canonical identifier (e.g. `"gemini"`). Preference lookups match this exactly.
    pub name: &'static str,
    /// Human-readable name for display. E.g. `"Google Gemini"`.
    pub display_name: &'static str,
    /// Conventional environment variable carrying the API key.
    pub env_key: &'static str,
    /// Default API base URL.
    pub default_api_base: &'static str,
    /// Default model identifier.
    pub default_model: &'static str,
    /// Adapter used to talk to this backend.
    pub shape: RequestShape,
}

/// Supported providers, in fixed display (and fallback) order.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI GPT-4",
        env_key: "OPENAI_API_KEY",
        default_api_base: "https://api.openai.com/v1",
        default_model: "gpt-4o",
        shape: RequestShape::OpenAi,
    },
    ProviderSpec {
        name: "gemini",
        display_name: "Google Gemini",
        env_key: "GOOGLE_API_KEY",
        default_api_base: "https://generativelanguage.googleapis.com/v1beta",
        default_model: "gemini-1.5-flash",
        shape: RequestShape::Gemini,
    },
    ProviderSpec {
        name: "anthropic",
        display_name: "Anthropic Claude",
        env_key: "ANTHROPIC_API_KEY",
        default_api_base: "https://api.anthropic.com/v1",
        default_model: "claude-3-5-sonnet-20241022",
        shape: RequestShape::Claude,
    },
    ProviderSpec {
        name: "cohere",
        display_name: "Cohere",
        env_key: "COHERE_API_KEY",
        default_api_base: "https://api.cohere.ai/v1",
        default_model: "command",
        shape: RequestShape::Cohere,
    },
];

/// Find a provider spec by exact canonical name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

// ─────────────────────────────────────────────
// Credential
// ─────────────────────────────────────────────

/// An API key. `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key, rejecting blank strings.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Credential(key))
        }
    }

    /// The raw secret, for building request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

// ─────────────────────────────────────────────
// ResolvedProvider: spec + user config
// ─────────────────────────────────────────────

/// One backend as configured for this process.
#[derive(Clone, Debug)]
pub struct ResolvedProvider {
    pub spec: &'static ProviderSpec,
    credential: Option<Credential>,
    /// API base URL without a trailing slash.
    pub endpoint: String,
    pub model: String,
}

impl ResolvedProvider {
    /// Join a spec with the user's config for it.
    pub fn resolve(spec: &'static ProviderSpec, config: &ProviderConfig) -> Self {
        let endpoint = config
            .api_base
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(spec.default_api_base)
            .trim_end_matches('/')
            .to_string();

        let model = config
            .model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(spec.default_model)
            .to_string();

        ResolvedProvider {
            spec,
            credential: Credential::new(config.api_key.as_str()),
            endpoint,
            model,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn display_name(&self) -> &'static str {
        self.spec.display_name
    }

    pub fn shape(&self) -> RequestShape {
        self.spec.shape
    }

    /// Whether a credential is present.
    pub fn is_available(&self) -> bool {
        self.credential.is_some()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}

/// Public availability record; carries no secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: &'static str,
    pub display_name: &'static str,
    pub available: bool,
}

// ─────────────────────────────────────────────
// ProviderRegistry
// ─────────────────────────────────────────────

/// The configured backends, in display order.
#[derive(Clone, Debug)]
pub struct ProviderRegistry {
    providers: Vec<ResolvedProvider>,
}

impl ProviderRegistry {
    /// Build the registry from loaded configuration.
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let default_config = ProviderConfig::default();
        let providers: Vec<ResolvedProvider> = PROVIDERS
            .iter()
            .map(|spec| {
                let provider_config = config.get_by_name(spec.name).unwrap_or(&default_config);
                ResolvedProvider::resolve(spec, provider_config)
            })
            .collect();

        for p in &providers {
            debug!(
                provider = p.name(),
                available = p.is_available(),
                endpoint = %p.endpoint,
                model = %p.model,
                "provider resolved"
            );
        }
        let available = providers.iter().filter(|p| p.is_available()).count();
        info!(available, total = providers.len(), "provider registry ready");

        ProviderRegistry { providers }
    }

    /// Every provider with its availability, in display order.
    pub fn list_providers(&self) -> Vec<ProviderStatus> {
        self.providers
            .iter()
            .map(|p| ProviderStatus {
                name: p.name(),
                display_name: p.display_name(),
                available: p.is_available(),
            })
            .collect()
    }

    /// True iff at least one provider has a credential.
    pub fn has_any_available(&self) -> bool {
        self.providers.iter().any(ResolvedProvider::is_available)
    }

    /// Exact lookup by canonical name.
    pub fn get(&self, name: &str) -> Option<&ResolvedProvider> {
        self.providers.iter().find(|p| p.name() == name)
    }

    /// All providers, in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedProvider> {
        self.providers.iter()
    }

    /// Available providers, in display order.
    pub fn available(&self) -> impl Iterator<Item = &ResolvedProvider> {
        self.providers.iter().filter(|p| p.is_available())
    }

    /// The order in which providers are tried.
    ///
    /// The preferred provider goes first when it exists and is available;
    /// every other available provider follows in display order. An unknown or
    /// unavailable preference is ignored.
    pub fn attempt_order(&self, preferred: Option<&str>) -> Vec<&ResolvedProvider> {
        let first = preferred
            .and_then(|name| self.get(name))
            .filter(|p| p.is_available());

        if preferred.is_some() && first.is_none() {
            debug!(preferred = preferred.unwrap_or_default(), "preferred provider unavailable, ignoring");
        }

        first
            .into_iter()
            .chain(
                self.available()
                    .filter(|p| first.map_or(true, |f| f.name() != p.name())),
            )
            .collect()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
