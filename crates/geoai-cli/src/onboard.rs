//! `geoai onboard`: write a default config and the data directories.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use geoai_core::config::{get_config_path, save_config, Config};
use geoai_core::utils::get_history_path;
use geoai_providers::PROVIDERS;

/// Run the onboard command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "🌍 GeoAI Setup".cyan().bold());
    println!();

    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    let history_dir = get_history_path();
    std::fs::create_dir_all(&history_dir)
        .with_context(|| format!("failed to create {}", history_dir.display()))?;
    println!("  {} history dir at {}", "✓".green(), history_dir.display());

    println!();
    println!("  Add at least one API key under \"providers\", or export one of:");
    for spec in PROVIDERS {
        println!("    {:<20} {}", spec.display_name, spec.env_key.dimmed());
    }
    println!();
    println!(
        "{}",
        "  Setup complete! Run `geoai chat` to start.".green()
    );
    println!();

    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
/// Returns whether a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
