use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::{
    load_config, DescriptionPolicy, ExtractError, ExtractionClient, InstructionPolicy, Pipeline,
    Prompt, PromptBuilder, ProviderConfig, ProviderFactory, RawTranscript, Recipe,
    ResponseValidator, TranscriptPayload,
};

/// Represents the desired output
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputMode {
    /// Run the model and validate its answer (default)
    #[default]
    Recipe,
    /// Stop after building the prompt
    Prompt,
}

/// Result of an extraction
#[derive(Debug, Clone)]
pub enum ExtractResult {
    /// Validated recipe
    Recipe(Recipe),
    /// The prompt that would have been sent
    Prompt(Prompt),
}

/// Model providers selectable from the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    OpenAI,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    /// Convert to provider name string used by the factory
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "google" => Some(ProviderKind::Google),
            "openai" => Some(ProviderKind::OpenAI),
            "anthropic" => Some(ProviderKind::Anthropic),
            "ollama" => Some(ProviderKind::Ollama),
            _ => None,
        }
    }

    /// Model used when configuration does not name one
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Google => "gemini-2.5-flash",
            ProviderKind::OpenAI => "gpt-4.1-mini",
            ProviderKind::Anthropic => "claude-sonnet-4-5",
            ProviderKind::Ollama => "llama3.2",
        }
    }
}

/// Builder for configuring and running a recipe extraction
#[derive(Debug, Default)]
pub struct RecipeExtractorBuilder {
    source: Option<TranscriptPayload>,
    mode: OutputMode,
    provider: Option<ProviderKind>,
    timeout: Option<Duration>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    description_policy: Option<DescriptionPolicy>,
    instruction_policy: Option<InstructionPolicy>,
}

impl RecipeExtractorBuilder {
    /// Use a transcript string in any supported format
    ///
    /// WEBVTT captions, serialized utterance JSON and plain prose are told
    /// apart automatically.
    ///
    /// # Example
    /// ```
    /// use kitchenfire_import::RecipeExtractor;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .text("First, boil about 200 grams of pasta.");
    /// ```
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(TranscriptPayload::Text(text.into()));
        self
    }

    /// Use WEBVTT captions
    ///
    /// Same as [`text`](Self::text); the captions are still classified.
    pub fn webvtt(self, captions: impl Into<String>) -> Self {
        self.text(captions)
    }

    /// Use an already-parsed transcript object, e.g. `{"utterances": [...]}`
    ///
    /// # Example
    /// ```
    /// use kitchenfire_import::RecipeExtractor;
    /// use serde_json::json;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .transcript_json(json!({"utterances": [{"text": "Dice the onion."}]}));
    /// ```
    pub fn transcript_json(mut self, value: Value) -> Self {
        self.source = Some(TranscriptPayload::Structured(value));
        self
    }

    /// Use a payload exactly as a transcript fetcher returned it
    pub fn payload(mut self, payload: TranscriptPayload) -> Self {
        self.source = Some(payload);
        self
    }

    /// Stop after building the prompt instead of calling the model
    ///
    /// # Example
    /// ```
    /// use kitchenfire_import::RecipeExtractor;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .text("Boil the pasta.")
    ///     .prompt_only();
    /// ```
    pub fn prompt_only(mut self) -> Self {
        self.mode = OutputMode::Prompt;
        self
    }

    /// Set the model provider
    ///
    /// # Example
    /// ```
    /// use kitchenfire_import::{ProviderKind, RecipeExtractor};
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .text("Boil the pasta.")
    ///     .provider(ProviderKind::Anthropic);
    /// ```
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the deadline for the model request
    ///
    /// # Example
    /// ```
    /// use kitchenfire_import::RecipeExtractor;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .text("Boil the pasta.")
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the API key for the provider
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Point the provider at a different endpoint (proxies, local gateways)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn description_policy(mut self, policy: DescriptionPolicy) -> Self {
        self.description_policy = Some(policy);
        self
    }

    pub fn instruction_policy(mut self, policy: InstructionPolicy) -> Self {
        self.instruction_policy = Some(policy);
        self
    }

    fn has_overrides(&self) -> bool {
        self.provider.is_some()
            || self.api_key.is_some()
            || self.model.is_some()
            || self.base_url.is_some()
    }

    /// Run the extraction
    ///
    /// # Errors
    /// Returns `ExtractError` if:
    /// - No transcript was specified
    /// - The provider cannot be configured
    /// - The model request fails or times out
    /// - The model output cannot be parsed or validated
    ///
    /// # Example
    /// ```no_run
    /// # use kitchenfire_import::RecipeExtractor;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = RecipeExtractor::builder()
    ///     .text("WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nBoil 200 grams of pasta.\n")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<ExtractResult, ExtractError> {
        let source = self.source.clone().ok_or_else(|| {
            ExtractError::BuilderError(
                "No transcript specified. Use .text(), .transcript_json() or .payload()"
                    .to_string(),
            )
        })?;
        let transcript = RawTranscript::classify(source);

        if let OutputMode::Prompt = self.mode {
            let prompt = PromptBuilder::default().build(&transcript.normalize());
            return Ok(ExtractResult::Prompt(prompt));
        }

        let pipeline = self.pipeline()?;
        let recipe = pipeline.run(transcript).await?;
        Ok(ExtractResult::Recipe(recipe))
    }

    fn pipeline(&self) -> Result<Pipeline, ExtractError> {
        let mut config = match load_config() {
            Ok(config) => config,
            // Explicit settings are enough on their own
            Err(e) if self.has_overrides() => {
                debug!("Ignoring unreadable configuration: {}", e);
                Default::default()
            }
            Err(e) => return Err(e.into()),
        };

        let provider_name = self
            .provider
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| config.default_provider.clone());

        let mut provider_config = match config.providers.remove(&provider_name) {
            Some(provider_config) => provider_config,
            None => {
                let kind = ProviderKind::from_name(&provider_name).ok_or_else(|| {
                    ExtractError::BuilderError(format!("Unknown provider: {}", provider_name))
                })?;
                ProviderConfig::for_model(kind.default_model())
            }
        };
        if let Some(key) = &self.api_key {
            provider_config.api_key = Some(key.clone());
        }
        if let Some(model) = &self.model {
            provider_config.model = model.clone();
        }
        if let Some(url) = &self.base_url {
            provider_config.base_url = Some(url.clone());
        }

        let provider = ProviderFactory::create(&provider_name, &provider_config)?;
        let timeout = self.timeout.unwrap_or_else(|| config.timeout_duration());
        let validator = ResponseValidator::new(
            self.description_policy
                .unwrap_or(config.validation.description_policy),
            self.instruction_policy
                .unwrap_or(config.validation.instruction_policy),
        );

        Ok(Pipeline::new(
            PromptBuilder::default(),
            ExtractionClient::with_timeout(provider, timeout),
            validator,
        ))
    }
}

/// Main entry point for the builder API
pub struct RecipeExtractor;

impl RecipeExtractor {
    /// Creates a new builder for extracting recipes
    ///
    /// # Example
    /// ```
    /// use kitchenfire_import::RecipeExtractor;
    ///
    /// let builder = RecipeExtractor::builder();
    /// ```
    pub fn builder() -> RecipeExtractorBuilder {
        RecipeExtractorBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_round_trips_names() {
        for kind in [
            ProviderKind::Google,
            ProviderKind::OpenAI,
            ProviderKind::Anthropic,
            ProviderKind::Ollama,
        ] {
            assert_eq!(ProviderKind::from_name(kind.as_str()), Some(kind));
            assert!(ProviderFactory::available_providers().contains(&kind.as_str()));
        }
        assert_eq!(ProviderKind::from_name("azure"), None);
    }

    #[tokio::test]
    async fn test_build_without_source() {
        let err = RecipeExtractor::builder().build().await.unwrap_err();
        assert!(matches!(err, ExtractError::BuilderError(_)));
    }

    #[tokio::test]
    async fn test_prompt_only() {
        let result = RecipeExtractor::builder()
            .text("WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nBoil 200 grams of pasta.\n")
            .prompt_only()
            .build()
            .await
            .unwrap();

        match result {
            ExtractResult::Prompt(prompt) => {
                assert!(prompt.as_str().ends_with("\nBoil 200 grams of pasta."))
            }
            ExtractResult::Recipe(_) => panic!("Expected Prompt result"),
        }
    }

    #[test]
    fn test_overrides_build_pipeline() {
        let pipeline = RecipeExtractor::builder()
            .text("Boil the pasta.")
            .provider(ProviderKind::OpenAI)
            .api_key("test-key")
            .model("gpt-4o")
            .timeout(Duration::from_secs(3))
            .pipeline()
            .unwrap();

        assert_eq!(pipeline.client().provider().provider_name(), "openai");
        assert_eq!(pipeline.client().provider().model(), "gpt-4o");
        assert_eq!(pipeline.client().timeout(), Duration::from_secs(3));
    }
}
