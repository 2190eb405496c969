use crate::store::RecipeRecord;

/// Selects which saved recipes a listing shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Only show recipes marked as favorite
    pub favorites_only: bool,
    /// Case-insensitive substring matched against ingredients and name
    pub query: Option<String>,
}

impl RecipeFilter {
    /// Matches every recipe
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches favorites only
    pub fn favorites() -> Self {
        Self {
            favorites_only: true,
            query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn matches(&self, record: &RecipeRecord) -> bool {
        if self.favorites_only && !record.is_favorite {
            return false;
        }

        match self.normalized_query() {
            Some(query) => {
                record.ingredients.to_lowercase().contains(&query)
                    || record.name.to_lowercase().contains(&query)
            }
            None => true,
        }
    }

    /// Blank queries count as no query
    fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordId;
    use chrono::Utc;

    fn record(ingredients: &str, name: &str, is_favorite: bool) -> RecipeRecord {
        RecipeRecord {
            id: RecordId(1),
            ingredients: ingredients.to_string(),
            recipe_text: format!("{name}\nsteps"),
            name: name.to_string(),
            is_favorite,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_matches_everything() {
        let filter = RecipeFilter::all();
        assert!(filter.matches(&record("eggs", "Omelette", false)));
        assert!(filter.matches(&record("", "", true)));
    }

    #[test]
    fn test_favorites_only() {
        let filter = RecipeFilter::favorites();
        assert!(filter.matches(&record("eggs", "Omelette", true)));
        assert!(!filter.matches(&record("eggs", "Omelette", false)));
    }

    #[test]
    fn test_query_is_case_insensitive_over_ingredients_and_name() {
        let filter = RecipeFilter::all().with_query("EGG");
        assert!(filter.matches(&record("Eggs, flour", "Pancakes", false)));
        assert!(filter.matches(&record("flour", "Scotch Egg", false)));
        assert!(!filter.matches(&record("flour", "Bread", false)));
    }

    #[test]
    fn test_query_does_not_search_recipe_body() {
        let mut r = record("flour", "Bread", false);
        r.recipe_text = "Brush with egg wash".to_string();
        assert!(!RecipeFilter::all().with_query("egg").matches(&r));
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let filter = RecipeFilter::all().with_query("   ");
        assert!(filter.matches(&record("flour", "Bread", false)));
    }

    #[test]
    fn test_favorites_and_query_combine() {
        let filter = RecipeFilter::favorites().with_query("rice");
        assert!(filter.matches(&record("rice", "Risotto", true)));
        assert!(!filter.matches(&record("rice", "Risotto", false)));
        assert!(!filter.matches(&record("pasta", "Carbonara", true)));
    }
}
