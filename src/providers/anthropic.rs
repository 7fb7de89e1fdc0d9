use crate::config::ProviderConfig;
use crate::error::ExtractError;
use crate::prompt::Prompt;
use crate::providers::{read_json, resolve_api_key, text_at, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ExtractError> {
        let api_key = resolve_api_key(config.api_key.as_ref(), &["ANTHROPIC_API_KEY"])?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(AnthropicProvider {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn submit(&self, prompt: &Prompt) -> Result<String, ExtractError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt.as_str()
                    }
                ]
            }))
            .send()
            .await?;

        let response_body = read_json(response, "Anthropic").await?;
        debug!("Anthropic response: {:?}", response_body);

        text_at(&response_body, "/content/0/text", "Anthropic")
    }
}
