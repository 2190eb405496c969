use crate::error::Result;
use crate::store::RecipeRecord;

/// Line placed between recipes in the plain-text export
pub const TEXT_EXPORT_DELIMITER: &str = "----------------------------------------";

/// Serialize recipes as a pretty-printed JSON array, in the order given.
pub fn to_json(recipes: &[RecipeRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(recipes)?)
}

/// Render recipes as a human-readable document, one block per recipe.
///
/// ```text
/// Fluffy Pancakes
/// Created: 2024-05-01 08:30:00 UTC
/// Ingredients: eggs, flour
///
/// <recipe text>
/// ```
pub fn to_text(recipes: &[RecipeRecord]) -> String {
    let blocks: Vec<String> = recipes.iter().map(text_block).collect();
    if blocks.is_empty() {
        return String::new();
    }

    let mut output = blocks.join(&format!("\n\n{}\n\n", TEXT_EXPORT_DELIMITER));
    output.push('\n');
    output
}

fn text_block(recipe: &RecipeRecord) -> String {
    let mut block = String::new();
    block.push_str(&recipe.name);
    if recipe.is_favorite {
        block.push_str(" ★");
    }
    block.push('\n');
    block.push_str(&format!(
        "Created: {}\n",
        recipe.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    block.push_str(&format!("Ingredients: {}\n\n", recipe.ingredients.trim()));
    block.push_str(recipe.recipe_text.trim_end());
    block
}
