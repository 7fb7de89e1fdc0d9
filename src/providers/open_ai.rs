use crate::config::ProviderConfig;
use crate::error::ExtractError;
use crate::prompt::Prompt;
use crate::providers::{read_json, resolve_api_key, text_at, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ExtractError> {
        // Try config first, then fall back to environment variable
        let api_key = resolve_api_key(config.api_key.as_ref(), &["OPENAI_API_KEY"])?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Create a new OpenAI provider with simple parameters
    pub fn with_api_key(api_key: String, model: String) -> Self {
        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAIProvider {
            base_url,
            ..Self::with_api_key(api_key, model)
        }
    }
}

/// POST a single user message to an OpenAI-compatible chat completions endpoint
pub(super) async fn chat_completion(
    client: &Client,
    base_url: &str,
    api_key: Option<&str>,
    provider: &str,
    body: serde_json::Value,
) -> Result<String, ExtractError> {
    let mut request = client.post(format!("{}/v1/chat/completions", base_url));
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request.json(&body).send().await?;
    let response_body = read_json(response, provider).await?;
    debug!("{} response: {:?}", provider, response_body);

    text_at(&response_body, "/choices/0/message/content", provider)
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn submit(&self, prompt: &Prompt) -> Result<String, ExtractError> {
        chat_completion(
            &self.client,
            &self.base_url,
            Some(&self.api_key),
            "OpenAI",
            json!({
                "model": self.model,
                "messages": [
                    {"role": "user", "content": prompt.as_str()}
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::normalize_payload;
    use crate::PromptBuilder;
    use mockito::Server;

    #[tokio::test]
    async fn test_submit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "content": "Here you go:\n{\"name\": \"Pasta\", \"tags\": [], \"description\": \"\", \"ingredients\": [], \"instructions\": \"1. Boil.\\n\"}"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let provider = OpenAIProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4.1-mini".to_string(),
        );
        let prompt = PromptBuilder::default().build(&normalize_payload("Boil pasta."));

        let result = provider.submit(&prompt).await.unwrap();
        assert!(result.starts_with("Here you go:"));
        assert!(result.contains("\"name\": \"Pasta\""));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Invalid request"}"#)
            .create_async()
            .await;

        let provider = OpenAIProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4.1-mini".to_string(),
        );
        let prompt = PromptBuilder::default().build(&normalize_payload("step"));

        let result = provider.submit(&prompt).await;
        assert!(matches!(result, Err(ExtractError::TransportError(ref m)) if m.contains("Invalid request")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_name() {
        let provider =
            OpenAIProvider::with_api_key("fake_api_key".to_string(), "gpt-4".to_string());
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model(), "gpt-4");
    }
}
