use crate::config::ProviderConfig;
use crate::error::ExtractError;
use crate::prompt::Prompt;
use crate::providers::{read_json, resolve_api_key, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ExtractError> {
        // Try config first, then fall back to environment variables
        let api_key = resolve_api_key(config.api_key.as_ref(), &["GOOGLE_API_KEY", "GEMINI_API_KEY"])?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(GoogleProvider {
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
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn submit(&self, prompt: &Prompt) -> Result<String, ExtractError> {
        // The key goes in a header so it cannot leak through URLs in error messages
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({
                "contents": [{
                    "parts": [{ "text": prompt.as_str() }]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens
                }
            }))
            .send()
            .await?;

        let response_body = read_json(response, "Google Gemini").await?;
        debug!("Google Gemini response: {:?}", response_body);

        // Gemini may split one answer across several parts
        let parts = response_body
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ExtractError::TransportError(
                    "Failed to extract content from Google Gemini response".to_string(),
                )
            })?;

        let text = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<&str>>()
            .concat();

        // A candidate cut off by MAX_TOKENS or safety filters can carry no text at all
        if text.is_empty() {
            return Err(ExtractError::TransportError(
                "Failed to extract content from Google Gemini response".to_string(),
            ));
        }

        Ok(text)
    }
}
