//! Shared generative-language client library for the nexus-qa workspace
//!
//! Provides a unified interface over text-generation backends:
//! - Gemini API (Google generative-language REST endpoint)
//! - Mock provider for tests

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;

pub use config::{Config, ModelPreset, ProviderConfig};
pub use error::{GenAiError, Result};
pub use provider::{LlmProvider, LlmRequest, LlmResponse, TokenUsage};
pub use providers::{MockProvider, ProviderKind, get_provider};
