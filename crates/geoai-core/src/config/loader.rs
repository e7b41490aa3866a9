//! Config loader: reads `~/.geoai/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.geoai/config.json`
//! 3. Environment variables `GEOAI_<SECTION>__<FIELD>` (override JSON)
//! 4. Conventional key variables (`OPENAI_API_KEY`, …) for providers that
//!    still have no key

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Canonical provider names, in the order the env pass visits them.
const PROVIDER_NAMES: &[&str] = &["openai", "gemini", "anthropic", "cohere"];

/// Conventional API key variables per provider, checked in order.
const CONVENTIONAL_KEY_VARS: &[(&str, &[&str])] = &[
    ("openai", &["OPENAI_API_KEY"]),
    ("gemini", &["GOOGLE_API_KEY", "GEMINI_API_KEY"]),
    ("anthropic", &["ANTHROPIC_API_KEY"]),
    ("cohere", &["COHERE_API_KEY", "CO_API_KEY"]),
];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Conventional env vars that may carry the API key for `provider`.
pub fn conventional_key_vars(provider: &str) -> &'static [&'static str] {
    CONVENTIONAL_KEY_VARS
        .iter()
        .find(|(name, _)| *name == provider)
        .map(|(_, vars)| *vars)
        .unwrap_or(&[])
}

/// Load configuration from the default path (or `path`) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_env_overrides_with(config, |key| std::env::var(key).ok())
}

/// Apply env overrides using `lookup` to resolve variable names.
///
/// Supported overrides:
/// - `GEOAI_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `GEOAI_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `GEOAI_PROVIDERS__<NAME>__MODEL` → `providers.<name>.model`
/// - `GEOAI_ORCHESTRATOR__MAX_TOKENS`, `__TEMPERATURE`, `__CONTEXT_MESSAGES`,
///   `__TIMEOUT_SECS`, `__TRANSIENT_RETRIES`, `__PREFERRED_PROVIDER`
/// - `OPENAI_API_KEY`, `GOOGLE_API_KEY`/`GEMINI_API_KEY`, `ANTHROPIC_API_KEY`,
///   `COHERE_API_KEY` when the provider still has no key
pub fn apply_env_overrides_with<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    for name in PROVIDER_NAMES {
        let Some(provider) = config.providers.get_by_name_mut(name) else {
            continue;
        };
        let upper = name.to_uppercase();

        if let Some(val) = lookup(&format!("GEOAI_PROVIDERS__{upper}__API_KEY")) {
            provider.api_key = val;
        }
        if let Some(val) = lookup(&format!("GEOAI_PROVIDERS__{upper}__API_BASE")) {
            provider.api_base = Some(val);
        }
        if let Some(val) = lookup(&format!("GEOAI_PROVIDERS__{upper}__MODEL")) {
            provider.model = Some(val);
        }

        if !provider.is_configured() {
            if let Some(val) = conventional_key_vars(name)
                .iter()
                .filter_map(|var| lookup(var))
                .find(|v| !v.trim().is_empty())
            {
                debug!(provider = name, "API key taken from conventional env var");
                provider.api_key = val;
            }
        }
    }

    let orch = &mut config.orchestrator;
    if let Some(val) = lookup("GEOAI_ORCHESTRATOR__MAX_TOKENS") {
        match val.parse::<u32>() {
            Ok(n) => orch.max_tokens = n,
            Err(_) => warn!("Ignoring invalid GEOAI_ORCHESTRATOR__MAX_TOKENS={}", val),
        }
    }
    if let Some(val) = lookup("GEOAI_ORCHESTRATOR__TEMPERATURE") {
        match val.parse::<f64>() {
            Ok(t) => orch.temperature = t,
            Err(_) => warn!("Ignoring invalid GEOAI_ORCHESTRATOR__TEMPERATURE={}", val),
        }
    }
    if let Some(val) = lookup("GEOAI_ORCHESTRATOR__CONTEXT_MESSAGES") {
        match val.parse::<usize>() {
            Ok(n) => orch.context_messages = n,
            Err(_) => warn!("Ignoring invalid GEOAI_ORCHESTRATOR__CONTEXT_MESSAGES={}", val),
        }
    }
    if let Some(val) = lookup("GEOAI_ORCHESTRATOR__TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(n) => orch.timeout_secs = n,
            Err(_) => warn!("Ignoring invalid GEOAI_ORCHESTRATOR__TIMEOUT_SECS={}", val),
        }
    }
    if let Some(val) = lookup("GEOAI_ORCHESTRATOR__TRANSIENT_RETRIES") {
        match val.parse::<u8>() {
            Ok(n) => orch.transient_retries = n,
            Err(_) => warn!("Ignoring invalid GEOAI_ORCHESTRATOR__TRANSIENT_RETRIES={}", val),
        }
    }
    if let Some(val) = lookup("GEOAI_ORCHESTRATOR__PREFERRED_PROVIDER") {
        orch.preferred_provider = if val.is_empty() { None } else { Some(val) };
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.orchestrator.max_tokens, 800);
        assert_eq!(config.orchestrator.timeout_secs, 30);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "providers": {
                "cohere": { "apiKey": "co-123" }
            },
            "orchestrator": {
                "contextMessages": 4
            }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.providers.cohere.api_key, "co-123");
        assert_eq!(config.orchestrator.context_messages, 4);
        // Default preserved
        assert_eq!(config.orchestrator.temperature, 0.7);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.orchestrator.max_tokens, 800);
        assert!(!config.providers.openai.is_configured());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.providers.anthropic.api_key = "sk-ant-test".to_string();
        config.orchestrator.preferred_provider = Some("anthropic".to_string());

        save_config(&config, Some(&path)).unwrap();
        assert!(path.exists());

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.providers.anthropic.api_key, "sk-ant-test");
        assert_eq!(
            reloaded.orchestrator.preferred_provider.as_deref(),
            Some("anthropic")
        );
    }

    #[test]
    fn test_saved_json_is_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        save_config(&Config::default(), Some(&path)).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"maxTokens\""));
        assert!(raw.contains("\"timeoutSecs\""));
        assert!(!raw.contains("max_tokens"));
    }

    #[test]
    fn test_env_override_provider_fields() {
        let config = apply_env_overrides_with(
            Config::default(),
            env(&[
                ("GEOAI_PROVIDERS__OPENAI__API_KEY", "sk-env"),
                ("GEOAI_PROVIDERS__OPENAI__API_BASE", "http://127.0.0.1:8080/v1"),
                ("GEOAI_PROVIDERS__COHERE__MODEL", "command-light"),
            ]),
        );
        assert_eq!(config.providers.openai.api_key, "sk-env");
        assert_eq!(
            config.providers.openai.api_base.as_deref(),
            Some("http://127.0.0.1:8080/v1")
        );
        assert_eq!(config.providers.cohere.model.as_deref(), Some("command-light"));
        assert!(!config.providers.cohere.is_configured());
    }

    #[test]
    fn test_env_conventional_key_fills_missing() {
        let config = apply_env_overrides_with(
            Config::default(),
            env(&[("GOOGLE_API_KEY", "AIza-env"), ("ANTHROPIC_API_KEY", "sk-ant-env")]),
        );
        assert_eq!(config.providers.gemini.api_key, "AIza-env");
        assert_eq!(config.providers.anthropic.api_key, "sk-ant-env");
        assert!(!config.providers.openai.is_configured());
    }

    #[test]
    fn test_env_conventional_key_second_choice() {
        let config = apply_env_overrides_with(
            Config::default(),
            env(&[("GOOGLE_API_KEY", ""), ("GEMINI_API_KEY", "AIza-second")]),
        );
        assert_eq!(config.providers.gemini.api_key, "AIza-second");
    }

    #[test]
    fn test_env_conventional_key_does_not_override_file_key() {
        let mut base = Config::default();
        base.providers.openai.api_key = "sk-file".to_string();
        let config = apply_env_overrides_with(base, env(&[("OPENAI_API_KEY", "sk-env")]));
        assert_eq!(config.providers.openai.api_key, "sk-file");
    }

    #[test]
    fn test_env_orchestrator_overrides() {
        let config = apply_env_overrides_with(
            Config::default(),
            env(&[
                ("GEOAI_ORCHESTRATOR__TIMEOUT_SECS", "12"),
                ("GEOAI_ORCHESTRATOR__MAX_TOKENS", "256"),
                ("GEOAI_ORCHESTRATOR__TEMPERATURE", "0.2"),
                ("GEOAI_ORCHESTRATOR__CONTEXT_MESSAGES", "6"),
                ("GEOAI_ORCHESTRATOR__TRANSIENT_RETRIES", "1"),
                ("GEOAI_ORCHESTRATOR__PREFERRED_PROVIDER", "cohere"),
            ]),
        );
        let orch = config.orchestrator;
        assert_eq!(orch.timeout_secs, 12);
        assert_eq!(orch.max_tokens, 256);
        assert_eq!(orch.temperature, 0.2);
        assert_eq!(orch.context_messages, 6);
        assert_eq!(orch.transient_retries, 1);
        assert_eq!(orch.preferred_provider.as_deref(), Some("cohere"));
    }

    #[test]
    fn test_env_invalid_number_ignored() {
        let config = apply_env_overrides_with(
            Config::default(),
            env(&[("GEOAI_ORCHESTRATOR__TIMEOUT_SECS", "soon")]),
        );
        assert_eq!(config.orchestrator.timeout_secs, 30);
    }

    #[test]
    fn test_conventional_key_vars() {
        assert_eq!(conventional_key_vars("openai"), &["OPENAI_API_KEY"]);
        assert!(conventional_key_vars("gemini").contains(&"GOOGLE_API_KEY"));
        assert!(conventional_key_vars("unknown").is_empty());
    }
}
