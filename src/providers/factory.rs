use crate::config::GeminiConfig;
use crate::error::Result;
use crate::providers::{GeminiProvider, LlmProvider, RetryingProvider};
use log::info;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the generation provider described by the configuration.
    ///
    /// Fails with [`crate::ChomptronError::MissingCredential`] when no API key is available.
    pub fn create(config: &GeminiConfig) -> Result<Box<dyn LlmProvider>> {
        let provider: Box<dyn LlmProvider> = Box::new(GeminiProvider::new(config)?);

        if config.retry_attempts > 1 {
            info!(
                "Retrying failed generations up to {} times",
                config.retry_attempts
            );
            return Ok(Box::new(RetryingProvider::new(
                provider,
                config.retry_attempts,
                config.retry_delay_ms,
            )));
        }

        Ok(provider)
    }
}
