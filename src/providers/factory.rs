use crate::config::{ExtractConfig, ProviderConfig};
use crate::error::ExtractError;
use crate::providers::{
    AnthropicProvider, GoogleProvider, LlmProvider, OllamaProvider, OpenAIProvider,
};
use config::ConfigError;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn LlmProvider>, ExtractError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(config_error(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        match provider_name {
            "google" => Ok(Box::new(GoogleProvider::new(config)?)),
            "openai" => Ok(Box::new(OpenAIProvider::new(config)?)),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config)?)),
            "ollama" => Ok(Box::new(OllamaProvider::new(config)?)),
            _ => Err(config_error(format!("Unknown provider: {}", provider_name))),
        }
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(
        config: &ExtractConfig,
    ) -> Result<Box<dyn LlmProvider>, ExtractError> {
        let provider_name = &config.default_provider;
        let provider_config = config.providers.get(provider_name).ok_or_else(|| {
            config_error(format!(
                "Default provider '{}' not found in configuration",
                provider_name
            ))
        })?;

        Self::create(provider_name, provider_config)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai", "anthropic", "ollama"]
    }
}

fn config_error(message: String) -> ExtractError {
    ExtractError::ConfigError(ConfigError::Message(message))
}
