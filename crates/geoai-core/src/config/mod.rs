//! Configuration system: schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use geoai_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Timeout: {}s", cfg.orchestrator.timeout_secs);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    apply_env_overrides, apply_env_overrides_with, conventional_key_vars, get_config_path,
    load_config, save_config,
};
pub use schema::{Config, OrchestratorConfig, ProviderConfig, ProvidersConfig};
