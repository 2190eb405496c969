/// The prompt template sent to the generation provider.
///
/// Loaded from `prompt.txt` at compile time. Contains an `{{INGREDIENTS}}`
/// placeholder that [`build_recipe_prompt`] replaces with the user's input.
pub const RECIPE_PROMPT_TEMPLATE: &str = include_str!("prompt.txt");

const INGREDIENTS_PLACEHOLDER: &str = "{{INGREDIENTS}}";

/// Build the generation prompt for the given ingredient list.
///
/// The input is inserted as-is, without trimming or escaping.
pub fn build_recipe_prompt(ingredients: &str) -> String {
    RECIPE_PROMPT_TEMPLATE.replace(INGREDIENTS_PLACEHOLDER, ingredients)
}
