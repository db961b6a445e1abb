//! Text-generation provider implementations

mod gemini;
pub mod mock;

pub use gemini::GeminiProvider;
pub use mock::MockProvider;

use crate::config::{ModelPreset, ProviderConfig};
use crate::error::{GenAiError, Result};
use crate::provider::LlmProvider;

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
}

impl ProviderKind {
    /// Parse provider kind from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            _ => Err(GenAiError::ConfigError(format!("Unknown provider: {}", s))),
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
        }
    }
}

/// Create a provider instance from a preset and optional config
pub fn get_provider(
    preset: &ModelPreset,
    provider_config: Option<&ProviderConfig>,
) -> Result<Box<dyn LlmProvider>> {
    let kind = ProviderKind::from_str(&preset.provider)?;

    match kind {
        ProviderKind::Gemini => {
            let api_key = get_api_key(provider_config, kind.env_var(), "Gemini")?;
            let base_url = provider_config.and_then(|c| c.base_url.as_deref());
            Ok(Box::new(GeminiProvider::new(
                &preset.model,
                api_key,
                base_url,
            )?))
        }
    }
}

/// Get API key from config or environment variable
fn get_api_key(
    config: Option<&ProviderConfig>,
    env_var: &str,
    provider_name: &str,
) -> Result<String> {
    // Check config first
    if let Some(key) = config.and_then(|c| c.api_key.clone()) {
        return Ok(key);
    }

    // Fall back to environment variable
    std::env::var(env_var).map_err(|_| GenAiError::MissingApiKey {
        provider: provider_name.to_string(),
        env_var: env_var.to_string(),
    })
}
