use crate::error::{ChomptronError, Result};
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

/// Wraps a provider and retries failed generations with linear backoff.
pub struct RetryingProvider {
    inner: Box<dyn LlmProvider>,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl RetryingProvider {
    pub fn new(inner: Box<dyn LlmProvider>, retry_attempts: u32, retry_delay_ms: u64) -> Self {
        RetryingProvider {
            inner,
            retry_attempts: retry_attempts.max(1),
            retry_delay_ms,
        }
    }

    /// Delay after the given failed attempt
    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(u64::from(attempt)))
    }
}

#[async_trait]
impl LlmProvider for RetryingProvider {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            debug!(
                "Generating with {} (attempt {}/{})",
                self.inner.provider_name(),
                attempt,
                self.retry_attempts
            );

            match self.inner.generate(prompt).await {
                Ok(text) => {
                    if attempt > 1 {
                        info!(
                            "{} succeeded after {} attempts",
                            self.inner.provider_name(),
                            attempt
                        );
                    }
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        "Provider {} failed (attempt {}/{}): {}",
                        self.inner.provider_name(),
                        attempt,
                        self.retry_attempts,
                        e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.retry_attempts {
                let delay = self.backoff(attempt);
                debug!("Waiting {:?} before retry", delay);
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ChomptronError::ProviderError("No generation attempts were made".to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Fails until `succeed_on` calls have been made
    struct FlakyProvider {
        calls: Arc<AtomicU32>,
        succeed_on: u32,
    }

    #[async_trait]
    impl LlmProvider for FlakyProvider {
        fn provider_name(&self) -> &str {
            "flaky"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.succeed_on {
                Ok(format!("recipe on call {call}"))
            } else {
                Err(ChomptronError::ProviderError(format!("boom {call}")))
            }
        }
    }

    fn flaky(succeed_on: u32) -> (Box<dyn LlmProvider>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let provider = FlakyProvider {
            calls: calls.clone(),
            succeed_on,
        };
        (Box::new(provider), calls)
    }

    #[tokio::test]
    async fn test_single_attempt_does_not_retry() {
        let (inner, calls) = flaky(2);
        let provider = RetryingProvider::new(inner, 1, 10);

        let err = provider.generate("prompt").await.unwrap_err();
        assert_eq!(err.to_string(), "boom 1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let (inner, calls) = flaky(3);
        let provider = RetryingProvider::new(inner, 3, 100);

        let text = provider.generate("prompt").await.unwrap();
        assert_eq!(text, "recipe on call 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_last_error_when_exhausted() {
        let (inner, calls) = flaky(10);
        let provider = RetryingProvider::new(inner, 2, 100);

        let err = provider.generate("prompt").await.unwrap_err();
        assert_eq!(err.to_string(), "boom 2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_backoff_grows_linearly_and_saturates() {
        let (inner, _) = flaky(1);
        let provider = RetryingProvider::new(inner, 3, 250);
        assert_eq!(provider.backoff(1), Duration::from_millis(250));
        assert_eq!(provider.backoff(2), Duration::from_millis(500));

        let (inner, _) = flaky(1);
        let provider = RetryingProvider::new(inner, 3, u64::MAX);
        assert_eq!(provider.backoff(2), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let (inner, _) = flaky(1);
        let provider = RetryingProvider::new(inner, 0, 10);
        assert_eq!(provider.retry_attempts, 1);
        assert_eq!(provider.provider_name(), "flaky");
    }
}
