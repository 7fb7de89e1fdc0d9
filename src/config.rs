use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Main extraction configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ExtractConfig {
    /// Provider to use when none is specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Model request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// How to treat repairable problems in the model output
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Configuration for a specific model provider
#[derive(Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gemini-2.5-flash", "gpt-4.1-mini")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Minimal enabled configuration for a model with default generation settings
    pub fn for_model(model: impl Into<String>) -> Self {
        ProviderConfig {
            enabled: true,
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

// Keys must never end up in logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("enabled", &self.enabled)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// What the validator does with a description of 100 words or more
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionPolicy {
    /// Cut back to the last complete sentence under 100 words
    #[default]
    Truncate,
    /// Fail with `DescriptionTooLong`
    Reject,
}

/// What the validator does with badly numbered instruction steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionPolicy {
    /// Renumber steps 1..n in the order they appear
    #[default]
    Renumber,
    /// Fail with `InstructionFormatError`
    Reject,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub description_policy: DescriptionPolicy,
    #[serde(default)]
    pub instruction_policy: InstructionPolicy,
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout() -> u64 {
    30
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            default_provider: default_provider(),
            providers: HashMap::new(),
            timeout: default_timeout(),
            validation: ValidationConfig::default(),
        }
    }
}

impl ExtractConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with KITCHENFIRE__ prefix
/// 2. config.toml file in current directory
/// 3. Default values
///
/// Environment variable format: KITCHENFIRE__PROVIDERS__GOOGLE__MODEL
pub fn load_config() -> Result<ExtractConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: KITCHENFIRE__PROVIDERS__GOOGLE__MODEL
        .add_source(
            Environment::with_prefix("KITCHENFIRE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
