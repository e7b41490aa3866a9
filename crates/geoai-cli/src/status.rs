//! `geoai status`: show configuration and provider availability.
//!
//! Never prints a key; only whether one is set.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use geoai_core::config::{get_config_path, load_config};
use geoai_providers::ProviderRegistry;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);
    let registry = ProviderRegistry::from_config(&config.providers);
    let orchestrator = &config.orchestrator;

    println!();
    println!("{}", "🌍 GeoAI Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    println!(
        "  {:<18} {} | max_tokens: {}",
        "Parameters:".bold(),
        format!("temp: {}", orchestrator.temperature).dimmed(),
        format!("{}", orchestrator.max_tokens).dimmed(),
    );
    println!(
        "  {:<18} {}s per attempt | {} history messages | {} transient retr{}",
        "Policy:".bold(),
        orchestrator.timeout_secs,
        orchestrator.context_messages,
        orchestrator.transient_retries,
        if orchestrator.transient_retries == 1 { "y" } else { "ies" },
    );
    println!(
        "  {:<18} {}",
        "Preferred:".bold(),
        orchestrator.preferred_provider.as_deref().unwrap_or("auto")
    );

    println!();
    println!("  {}", "Providers:".bold());
    for provider in registry.iter() {
        let state = if provider.is_available() {
            format!("{} {}", "✓ available".green(), provider.model.dimmed())
        } else {
            format!("{}", "· not configured".dimmed())
        };
        println!("    {:<20} {}", provider.display_name(), state);
    }

    if !registry.has_any_available() {
        println!();
        println!(
            "  {}",
            "No API keys found; answers will use offline analysis.".yellow()
        );
    }
    println!();

    Ok(())
}
