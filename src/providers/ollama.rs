use super::open_ai::chat_completion;
use crate::config::ProviderConfig;
use crate::error::ExtractError;
use crate::prompt::Prompt;
use crate::providers::LlmProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaProvider {
    /// Create a new Ollama provider from configuration. No API key is needed.
    pub fn new(config: &ProviderConfig) -> Result<Self, ExtractError> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "http://localhost:11434".to_string());

        Ok(OllamaProvider {
            client: Client::new(),
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn submit(&self, prompt: &Prompt) -> Result<String, ExtractError> {
        // Ollama exposes an OpenAI-compatible API
        chat_completion(
            &self.client,
            &self.base_url,
            None,
            "Ollama",
            json!({
                "model": self.model,
                "messages": [
                    {"role": "user", "content": prompt.as_str()}
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
                "stream": false
            }),
        )
        .await
    }
}
