//! LLM client wrapper for nexus
//!
//! Provides a simplified interface to the genai-client crate.

use anyhow::{Context, Result};
use genai_client::{Config, LlmProvider, LlmRequest, get_provider};

/// Wrapper around text-generation providers for the nexus pipelines
pub struct LlmClient {
    provider: Box<dyn LlmProvider>,
    debug: bool,
}

impl LlmClient {
    /// Create a new LLM client from the configured preset.
    ///
    /// If `preset_name` is None, uses the default preset for "nexus".
    pub fn new(preset_name: Option<&str>, debug: bool) -> Result<Self> {
        let config = Config::load().context("Failed to load LLM configuration")?;

        let preset_name = preset_name.unwrap_or_else(|| config.get_default_for_program("nexus"));
        let preset = config
            .get_preset(preset_name)
            .context(format!("Unknown preset: {}", preset_name))?;

        let provider_config = config.get_provider_config(&preset.provider);
        let provider = get_provider(preset, provider_config).context(format!(
            "Failed to initialize provider '{}' for preset '{}'",
            preset.provider, preset_name
        ))?;
        provider.is_available()?;

        if debug {
            log::info!(
                "Using provider: {} (model: {})",
                provider.name(),
                preset.model
            );
        }

        Ok(Self { provider, debug })
    }

    /// Wrap an existing provider. Used by tests to inject a mock.
    pub fn from_provider(provider: Box<dyn LlmProvider>) -> Self {
        Self {
            provider,
            debug: false,
        }
    }

    /// Send a completion request and return the generated text.
    pub async fn complete(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        let request = LlmRequest {
            prompt: prompt.to_string(),
            system_prompt: system_prompt.map(str::to_string),
            max_tokens: None,
            temperature: None,
        };

        if self.debug {
            log::info!("Sending request to {}", self.provider.name());
        }

        let response = self
            .provider
            .complete(request)
            .await
            .context("Text generation request failed")?;

        if self.debug {
            if let Some(usage) = &response.usage {
                log::info!(
                    "Tokens: {} in, {} out",
                    usage.input_tokens,
                    usage.output_tokens
                );
            }
        }

        Ok(response.content)
    }
}
