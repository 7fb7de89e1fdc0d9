//! Turn cooking video transcripts into structured recipes.
//!
//! A transcript (WEBVTT captions, utterance JSON or plain text) is flattened
//! into dialogue, wrapped in a fixed extraction prompt, sent to a generative
//! model, and the answer is validated into a [`Recipe`].
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), kitchenfire_import::ExtractError> {
//! use kitchenfire_import::{ExtractResult, ProviderKind, RecipeExtractor};
//!
//! let result = RecipeExtractor::builder()
//!     .text("WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nBoil 200 grams of pasta.\n")
//!     .provider(ProviderKind::Google)
//!     .build()
//!     .await?;
//!
//! if let ExtractResult::Recipe(recipe) = result {
//!     println!("{}", recipe.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod transcript;
pub mod validator;

pub use builder::{ExtractResult, OutputMode, ProviderKind, RecipeExtractor, RecipeExtractorBuilder};
pub use client::ExtractionClient;
pub use config::{
    load_config, DescriptionPolicy, ExtractConfig, InstructionPolicy, ProviderConfig,
    ValidationConfig,
};
pub use error::{ExtractError, ValidationError};
pub use model::{Ingredient, Recipe};
pub use pipeline::{Pipeline, PipelineStage};
pub use prompt::{Prompt, PromptBuilder, PromptTemplate, RECIPE_TEMPLATE_V1};
pub use providers::{LlmProvider, ProviderFactory};
pub use transcript::{
    normalize_payload, NormalizedTranscript, RawTranscript, TranscriptFormat, TranscriptPayload,
};
pub use validator::ResponseValidator;

/// Extract a recipe using the provider and policies from configuration
pub async fn extract_recipe(
    transcript: impl Into<TranscriptPayload>,
) -> Result<Recipe, ExtractError> {
    let config = load_config()?;
    let pipeline = Pipeline::from_config(&config)?;
    pipeline
        .run(RawTranscript::classify(transcript.into()))
        .await
}

/// Build the prompt a transcript would be sent with, without calling a model
pub fn build_prompt(transcript: impl Into<TranscriptPayload>) -> Prompt {
    PromptBuilder::default().build(&normalize_payload(transcript))
}

/// Validate raw model output with the default repair policies
pub fn validate_response(raw_output: &str) -> Result<Recipe, ExtractError> {
    ResponseValidator::default().validate(raw_output)
}
