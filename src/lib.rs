pub mod config;
pub mod error;
pub mod providers;
pub mod server;
pub mod store;

pub use config::AppConfig;
pub use error::{ChomptronError, Result};
pub use providers::{build_recipe_prompt, LlmProvider, ProviderFactory};
pub use store::{RecipeFilter, RecipeRecord, RecipeStore, RecordId};

use log::debug;

/// Ask `provider` for a recipe that uses the given ingredients.
pub async fn generate_recipe(provider: &dyn LlmProvider, ingredients: &str) -> Result<String> {
    let prompt = build_recipe_prompt(ingredients);
    debug!(
        "Requesting recipe from {} for: {}",
        provider.provider_name(),
        ingredients
    );
    provider.generate(&prompt).await
}
