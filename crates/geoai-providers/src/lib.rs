//! LLM provider layer for GeoAI.
//!
//! # Architecture
//!
//! - [`registry`]: static specs for the four backends + the immutable registry
//! - [`traits::ChatAdapter`]: trait every backend adapter implements
//! - [`error::ProviderError`]: failure taxonomy shared by all adapters
//! - [`openai`], [`gemini`], [`anthropic`], [`cohere`]: one adapter per wire shape
//! - [`http::create_adapter`]: picks the adapter for a provider's shape

pub mod anthropic;
pub mod cohere;
pub mod error;
pub mod gemini;
pub mod http;
pub mod openai;
pub mod registry;
pub mod traits;

pub use error::ProviderError;
pub use http::{build_client, create_adapter};
pub use registry::{
    Credential, ProviderRegistry, ProviderSpec, ProviderStatus, RequestShape, ResolvedProvider,
    PROVIDERS,
};
pub use traits::{ChatAdapter, CompletionRequest, GenerationParams};
