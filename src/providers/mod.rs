mod factory;
mod gemini;
mod prompt;
mod retry;

pub use factory::ProviderFactory;
pub use gemini::GeminiProvider;
pub use prompt::{build_recipe_prompt, RECIPE_PROMPT_TEMPLATE};
pub use retry::RetryingProvider;

use crate::error::Result;
use async_trait::async_trait;

/// Text-generation service that turns a prompt into recipe text
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "gemini")
    fn provider_name(&self) -> &str;

    /// Send a prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String>;
}
