use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while turning a transcript into a recipe
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The model endpoint could not be reached or refused the request
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The model did not answer within the configured deadline
    #[error("Model request timed out after {0:?}")]
    TimeoutError(Duration),

    /// No JSON object could be recovered from the model output
    #[error("Failed to parse model output: {0}")]
    ParseError(String),

    /// The recovered JSON violates the recipe schema
    #[error("Recipe validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),
}

/// Schema violations that could not be repaired
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("recipe name is missing or empty")]
    MissingName,

    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("description has {words} words, the limit is under 100")]
    DescriptionTooLong { words: usize },

    #[error("instructions are not numbered correctly: {0}")]
    InstructionFormatError(String),
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        // Some providers authenticate through the URL, so it never goes into the message
        ExtractError::TransportError(err.without_url().to_string())
    }
}
