use crate::client::ExtractionClient;
use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::model::Recipe;
use crate::prompt::{Prompt, PromptBuilder};
use crate::providers::ProviderFactory;
use crate::transcript::RawTranscript;
use crate::validator::ResponseValidator;
use log::{debug, info, warn};
use std::fmt;

/// Where an invocation got to. Every failure is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Fetched,
    Normalized,
    PromptBuilt,
    Submitted,
    Valid,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Fetched => "fetched",
            PipelineStage::Normalized => "normalized",
            PipelineStage::PromptBuilt => "prompt_built",
            PipelineStage::Submitted => "submitted",
            PipelineStage::Valid => "valid",
        };
        f.write_str(name)
    }
}

/// Transcript in, recipe out.
///
/// Holds only immutable configuration, so one pipeline can serve many
/// concurrent [`Pipeline::run`] calls. It never retries.
pub struct Pipeline {
    builder: PromptBuilder,
    client: ExtractionClient,
    validator: ResponseValidator,
}

impl Pipeline {
    pub fn new(builder: PromptBuilder, client: ExtractionClient, validator: ResponseValidator) -> Self {
        Pipeline {
            builder,
            client,
            validator,
        }
    }

    /// Build a pipeline around the configured default provider
    pub fn from_config(config: &ExtractConfig) -> Result<Self, ExtractError> {
        let provider = ProviderFactory::get_default_provider(config)?;
        Ok(Pipeline::new(
            PromptBuilder::default(),
            ExtractionClient::with_timeout(provider, config.timeout_duration()),
            ResponseValidator::from_config(&config.validation),
        ))
    }

    pub fn client(&self) -> &ExtractionClient {
        &self.client
    }

    /// Normalize the transcript and build the prompt, without calling the model
    pub fn prompt_for(&self, transcript: &RawTranscript) -> Prompt {
        let normalized = transcript.normalize();
        self.builder.build(&normalized)
    }

    pub async fn run(&self, transcript: RawTranscript) -> Result<Recipe, ExtractError> {
        let mut stage = PipelineStage::Fetched;
        debug!("Pipeline {}: {} transcript", stage, transcript.format());

        let normalized = transcript.normalize();
        stage = PipelineStage::Normalized;
        debug!("Pipeline {}: {} characters", stage, normalized.as_str().len());
        if normalized.is_empty() {
            warn!("Transcript contained no dialogue, the model will see an empty transcript");
        }

        let prompt = self.builder.build(&normalized);
        stage = PipelineStage::PromptBuilt;
        debug!(
            "Pipeline {}: template v{}",
            stage,
            self.builder.template_version()
        );

        let result = self
            .client
            .submit(&prompt)
            .await
            .and_then(|raw_output| {
                stage = PipelineStage::Submitted;
                debug!("Pipeline {}: raw model output: {}", stage, raw_output);
                self.validator.validate(&raw_output)
            });

        match result {
            Ok(recipe) => {
                info!(
                    "Extracted recipe '{}' with {} ingredients using {}",
                    recipe.name,
                    recipe.ingredients.len(),
                    self.client.provider().provider_name()
                );
                debug!("Pipeline {}", PipelineStage::Valid);
                Ok(recipe)
            }
            Err(e) => {
                warn!("Pipeline failed after stage {}: {}", stage, e);
                Err(e)
            }
        }
    }
}
