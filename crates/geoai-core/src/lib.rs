//! Core types, configuration, and utilities shared by the GeoAI crates.
//!
//! - [`types`]: conversation messages and the normalized response result
//! - [`config`]: JSON config schema, loader, and env var overrides
//! - [`utils`]: data paths and string helpers

pub mod config;
pub mod types;
pub mod utils;

pub use types::{Attempt, AttemptOutcome, ConversationMessage, ResponseResult, Role, FALLBACK_PROVIDER};
