//! GeoAI agent: response orchestration over the configured providers.
//!
//! This crate contains:
//! - **context**: the analyst system instruction and the bounded context window
//! - **fallback**: offline keyword-matched analysis
//! - **orchestrator**: the sequential provider fallback chain

pub mod context;
pub mod fallback;
pub mod orchestrator;

pub use context::{build_window, SYSTEM_PROMPT};
pub use fallback::{latest_user_text, synthesize};
pub use orchestrator::{Orchestrator, OrchestratorSettings};
