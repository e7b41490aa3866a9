//! GeoAI CLI: entry point.
//!
//! # Commands
//!
//! - `geoai ask MESSAGE [--provider NAME]`: single question
//! - `geoai chat [--provider NAME]`: interactive REPL
//! - `geoai status`: provider availability and settings
//! - `geoai onboard`: write a default config

mod helpers;
mod onboard;
mod repl;
mod status;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use geoai_agent::Orchestrator;
use geoai_core::config::{load_config, Config};
use geoai_core::types::ConversationMessage;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🌍 GeoAI: geopolitical analysis across OpenAI, Gemini, Claude, and Cohere
#[derive(Parser)]
#[command(name = "geoai", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.geoai/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question
    Ask {
        /// The question
        message: String,

        /// Provider to try first (name or part of its display name)
        #[arg(short, long)]
        provider: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Interactive chat session
    Chat {
        /// Provider to try first (name or part of its display name)
        #[arg(short, long)]
        provider: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show provider availability and settings
    Status,

    /// Write a default config file
    Onboard,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(helpers::expand_tilde);

    match cli.command {
        Commands::Ask {
            message,
            provider,
            logs,
        } => {
            init_logging(logs);
            let config = load_config(config_path.as_deref());
            run_ask(&config, &message, provider.as_deref()).await
        }
        Commands::Chat { provider, logs } => {
            init_logging(logs);
            let config = load_config(config_path.as_deref());
            let orchestrator = build_orchestrator(&config)?;
            let preferred = resolve_flag(&orchestrator, provider.as_deref());
            repl::run(orchestrator, preferred).await
        }
        Commands::Status => status::run(config_path.as_deref()),
        Commands::Onboard => onboard::run(config_path.as_deref()),
    }
}

// ─────────────────────────────────────────────
// Ask command
// ─────────────────────────────────────────────

async fn run_ask(config: &Config, message: &str, provider: Option<&str>) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let preferred = resolve_flag(&orchestrator, provider);

    let conversation = vec![ConversationMessage::user(message)];
    info!(preferred = preferred.unwrap_or("auto"), "asking single question");

    helpers::print_thinking();
    let ctrl_c = helpers::cancel_on_ctrl_c();
    let result = orchestrator
        .get_response_cancellable(&conversation, preferred, ctrl_c.token())
        .await;
    helpers::clear_thinking();

    match result {
        Some(result) => helpers::print_response(&result, orchestrator.registry()),
        None => helpers::print_cancelled(),
    }
    Ok(())
}

/// Build the orchestrator from loaded configuration.
pub fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    Orchestrator::from_config(config).context("failed to build HTTP client")
}

/// Turn a `--provider` hint into a canonical name, warning when nothing matches.
fn resolve_flag(orchestrator: &Orchestrator, hint: Option<&str>) -> Option<&'static str> {
    let hint = hint?;
    let statuses = orchestrator.registry().list_providers();
    match helpers::match_provider(hint, &statuses) {
        helpers::ProviderChoice::Named(name) => Some(name),
        helpers::ProviderChoice::Auto => None,
        helpers::ProviderChoice::Unknown => {
            warn!(hint, "no provider matches, using automatic order");
            None
        }
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("geoai=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
