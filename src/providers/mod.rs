mod anthropic;
mod factory;
mod google;
mod ollama;
mod open_ai;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;

use crate::error::ExtractError;
use crate::prompt::Prompt;
use async_trait::async_trait;
use reqwest::Response;
use serde_json::Value;

/// One request/response round trip to a generative model.
///
/// Implementations never retry; callers that want retries wrap the call.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// The model identifier sent with every request
    fn model(&self) -> &str;

    /// Send the prompt and return the model's text exactly as produced
    async fn submit(&self, prompt: &Prompt) -> Result<String, ExtractError>;
}

/// Check the status and API error envelope, returning the JSON body on success
pub(crate) async fn read_json(response: Response, provider: &str) -> Result<Value, ExtractError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| api_error_message(&value))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        return Err(ExtractError::TransportError(format!(
            "{} API error ({}): {}",
            provider,
            status.as_u16(),
            detail
        )));
    }

    let body: Value = response.json().await?;

    if let Some(message) = api_error_message(&body) {
        return Err(ExtractError::TransportError(format!(
            "{} API error: {}",
            provider, message
        )));
    }

    Ok(body)
}

fn api_error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(error) => Some(
            error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string(),
        ),
        _ => None,
    }
}

/// Take a string out of a response body, or fail without exposing partial output
pub(crate) fn text_at(body: &Value, pointer: &str, provider: &str) -> Result<String, ExtractError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ExtractError::TransportError(format!(
                "Failed to extract content from {} response",
                provider
            ))
        })
}

/// Resolve an API key from configuration, then from the given environment variables
pub(crate) fn resolve_api_key(
    configured: Option<&String>,
    env_vars: &[&str],
) -> Result<String, ExtractError> {
    configured
        .cloned()
        .or_else(|| env_vars.iter().find_map(|name| std::env::var(name).ok()))
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ExtractError::ConfigError(config::ConfigError::Message(format!(
                "{} not found in config or environment",
                env_vars.join(" or ")
            )))
        })
}
