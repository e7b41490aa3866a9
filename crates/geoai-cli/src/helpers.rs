//! Shared CLI helpers: path expansion, provider hints, response printing,
//! Ctrl-C cancellation.

use std::path::PathBuf;

use colored::Colorize;
use tokio_util::sync::CancellationToken;

use geoai_core::types::ResponseResult;
use geoai_providers::{ProviderRegistry, ProviderStatus};

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ─────────────────────────────────────────────
// Provider hints
// ─────────────────────────────────────────────

/// What a user-typed provider hint resolved to.
#[derive(Debug, PartialEq, Eq)]
pub enum ProviderChoice {
    /// A canonical provider name.
    Named(&'static str),
    /// Clear the preference and use the default order.
    Auto,
    Unknown,
}

/// Resolve a loose hint like `"claude"` or `"GPT"` against the provider list.
///
/// An exact canonical name wins; otherwise the first provider whose name or
/// display name contains the hint (case-insensitive) is chosen.
pub fn match_provider(hint: &str, statuses: &[ProviderStatus]) -> ProviderChoice {
    let hint = hint.trim().to_lowercase();
    if hint.is_empty() {
        return ProviderChoice::Unknown;
    }
    if hint == "auto" {
        return ProviderChoice::Auto;
    }

    statuses
        .iter()
        .find(|s| s.name == hint)
        .or_else(|| {
            statuses.iter().find(|s| {
                s.name.contains(hint.as_str()) || s.display_name.to_lowercase().contains(&hint)
            })
        })
        .map_or(ProviderChoice::Unknown, |s| ProviderChoice::Named(s.name))
}

// ─────────────────────────────────────────────
// Output
// ─────────────────────────────────────────────

/// Print an answer with its provenance label.
pub fn print_response(result: &ResponseResult, registry: &ProviderRegistry) {
    println!();
    if result.was_fallback {
        println!("{}", "⚠ offline analysis".yellow().bold());
        println!("{}", result.text.yellow());
    } else {
        let label = registry
            .get(&result.provider_name)
            .map_or(result.provider_name.as_str(), |p| p.display_name());
        println!("{}", format!("🌍 via {label}").cyan().bold());
        println!("{}", result.text);
    }
    println!();
}

pub fn print_cancelled() {
    println!();
    println!("{}", "(request cancelled)".dimmed());
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🌍 GeoAI".cyan().bold(), version.dimmed());
    println!(
        "{}",
        "Ask about any region or conflict. /providers, /provider <name|auto>, \"exit\" to quit."
            .dimmed()
    );
    println!();
}

/// Print a "thinking" placeholder (for non-log mode).
pub fn print_thinking() {
    eprint!("{}", "⠿ analyzing...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Ctrl-C
// ─────────────────────────────────────────────

/// Cancels its token on Ctrl-C until dropped.
pub struct CtrlCGuard {
    token: CancellationToken,
    watcher: tokio::task::JoinHandle<()>,
}

impl CtrlCGuard {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for CtrlCGuard {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

/// Watch for Ctrl-C while one request is in flight.
pub fn cancel_on_ctrl_c() -> CtrlCGuard {
    let token = CancellationToken::new();
    let trigger = token.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    CtrlCGuard { token, watcher }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use geoai_core::config::ProvidersConfig;

    fn statuses() -> Vec<ProviderStatus> {
        ProviderRegistry::from_config(&ProvidersConfig::default()).list_providers()
    }

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/foo/bar");
        assert!(result.ends_with("foo/bar"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        let result = expand_tilde("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn match_provider_exact_name() {
        assert_eq!(match_provider("gemini", &statuses()), ProviderChoice::Named("gemini"));
    }

    #[test]
    fn match_provider_display_substring() {
        let s = statuses();
        assert_eq!(match_provider("Claude", &s), ProviderChoice::Named("anthropic"));
        assert_eq!(match_provider("gpt", &s), ProviderChoice::Named("openai"));
        assert_eq!(match_provider("google", &s), ProviderChoice::Named("gemini"));
    }

    #[test]
    fn match_provider_auto_and_unknown() {
        let s = statuses();
        assert_eq!(match_provider(" AUTO ", &s), ProviderChoice::Auto);
        assert_eq!(match_provider("mistral", &s), ProviderChoice::Unknown);
        assert_eq!(match_provider("", &s), ProviderChoice::Unknown);
    }
}
