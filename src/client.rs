use crate::error::ExtractError;
use crate::prompt::Prompt;
use crate::providers::LlmProvider;
use log::{debug, warn};
use std::time::{Duration, Instant};
use tokio::time::timeout;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends prompts to a model provider under a deadline.
///
/// When the deadline passes the provider future is dropped, which cancels the
/// underlying request; nothing it may have received is returned.
pub struct ExtractionClient {
    provider: Box<dyn LlmProvider>,
    timeout: Duration,
}

impl ExtractionClient {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self::with_timeout(provider, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(provider: Box<dyn LlmProvider>, timeout: Duration) -> Self {
        ExtractionClient { provider, timeout }
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Submit the prompt and return the raw model text
    pub async fn submit(&self, prompt: &Prompt) -> Result<String, ExtractError> {
        let start = Instant::now();
        debug!(
            "Submitting prompt ({} bytes) to {} model {}",
            prompt.as_str().len(),
            self.provider.provider_name(),
            self.provider.model()
        );

        match timeout(self.timeout, self.provider.submit(prompt)).await {
            Ok(Ok(text)) => {
                debug!(
                    "{} answered in {} ms",
                    self.provider.provider_name(),
                    start.elapsed().as_millis()
                );
                Ok(text)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!(
                    "{} did not answer within {:?}",
                    self.provider.provider_name(),
                    self.timeout
                );
                Err(ExtractError::TimeoutError(self.timeout))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::transcript::normalize_payload;
    use crate::PromptBuilder;
    use async_trait::async_trait;

    /// Answers with a fixed text after a delay
    pub(crate) struct StaticProvider {
        pub(crate) response: Result<String, String>,
        pub(crate) delay: Duration,
    }

    impl StaticProvider {
        pub(crate) fn answering(text: &str) -> Self {
            StaticProvider {
                response: Ok(text.to_string()),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for StaticProvider {
        fn provider_name(&self) -> &str {
            "static"
        }

        fn model(&self) -> &str {
            "static-model"
        }

        async fn submit(&self, _prompt: &Prompt) -> Result<String, ExtractError> {
            tokio::time::sleep(self.delay).await;
            self.response
                .clone()
                .map_err(ExtractError::TransportError)
        }
    }

    fn prompt() -> Prompt {
        PromptBuilder::default().build(&normalize_payload("Boil pasta."))
    }

    #[tokio::test]
    async fn test_submit_passes_text_through_unmodified() {
        let raw = "Sure! ```json\n{\"name\": \"Pasta\"}\n```";
        let client = ExtractionClient::new(Box::new(StaticProvider::answering(raw)));
        assert_eq!(client.submit(&prompt()).await.unwrap(), raw);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let provider = StaticProvider {
            response: Ok("{\"name\": \"Too late\"}".to_string()),
            delay: Duration::from_millis(200),
        };
        let client = ExtractionClient::with_timeout(Box::new(provider), Duration::from_millis(1));

        let err = client.submit(&prompt()).await.unwrap_err();
        assert!(matches!(err, ExtractError::TimeoutError(d) if d == Duration::from_millis(1)));
    }

    #[tokio::test]
    async fn test_transport_error_is_returned() {
        let provider = StaticProvider {
            response: Err("connection refused".to_string()),
            delay: Duration::ZERO,
        };
        let client = ExtractionClient::new(Box::new(provider));

        let err = client.submit(&prompt()).await.unwrap_err();
        assert!(matches!(err, ExtractError::TransportError(ref m) if m == "connection refused"));
    }
}
