//! Recipe history: a bounded, newest-first collection of generated recipes
//! mirrored in full into a key-value slot after every change.
//!
//! Persistence is best-effort. A slot that cannot be read or decoded is
//! treated as empty history, and a failed write leaves the in-memory
//! collection authoritative for the rest of the session.

mod export;
mod filter;
mod name;
mod record;
mod storage;

pub use export::TEXT_EXPORT_DELIMITER;
pub use filter::RecipeFilter;
pub use name::{derive_name, MAX_NAME_LEN, UNTITLED_RECIPE};
pub use record::{RecipeRecord, RecordId};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

use crate::error::{ChomptronError, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashSet;

/// Key of the slot holding the serialized collection
pub const STORAGE_KEY: &str = "chomptron_recipe_history";

/// Most recipes kept; saving beyond this drops the oldest
pub const MAX_RECIPES: usize = 100;

pub struct RecipeStore<S: KeyValueStorage> {
    storage: S,
    recipes: Vec<RecipeRecord>,
    mirror_stale: bool,
}

impl<S: KeyValueStorage> RecipeStore<S> {
    /// Load the collection from `storage`.
    ///
    /// Missing, empty or undecodable data yields an empty collection.
    pub fn initialize(storage: S) -> Self {
        let recipes = match storage.get(STORAGE_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => decode_history(&raw),
            Ok(_) => Vec::new(),
            Err(e) => {
                warn!("Could not read recipe history, starting empty: {}", e);
                Vec::new()
            }
        };
        debug!("Loaded {} saved recipes", recipes.len());

        RecipeStore {
            storage,
            recipes,
            mirror_stale: false,
        }
    }

    /// Save a freshly generated recipe at the front of the collection.
    pub fn save_recipe(&mut self, ingredients: &str, recipe_text: &str) -> RecordId {
        self.save_recipe_at(ingredients, recipe_text, Utc::now())
    }

    /// Like [`save_recipe`](Self::save_recipe) with an explicit creation time.
    pub fn save_recipe_at(
        &mut self,
        ingredients: &str,
        recipe_text: &str,
        created_at: DateTime<Utc>,
    ) -> RecordId {
        let id = self.next_id(created_at);
        let record = RecipeRecord {
            id,
            ingredients: ingredients.to_string(),
            recipe_text: recipe_text.to_string(),
            name: derive_name(recipe_text),
            is_favorite: false,
            created_at,
        };
        debug!("Saving recipe {} ({})", id, record.name);

        self.recipes.insert(0, record);
        self.recipes.truncate(MAX_RECIPES);
        self.persist();
        id
    }

    /// Recipes matching `filter`, newest first.
    ///
    /// The iterator borrows the store; call again for a fresh pass.
    pub fn get_recipes<'a: 'f, 'f>(
        &'a self,
        filter: &'f RecipeFilter,
    ) -> impl Iterator<Item = &'a RecipeRecord> + 'f {
        self.recipes.iter().filter(move |record| filter.matches(record))
    }

    /// The full collection, newest first
    pub fn recipes(&self) -> &[RecipeRecord] {
        &self.recipes
    }

    pub fn get(&self, id: RecordId) -> Option<&RecipeRecord> {
        self.recipes.iter().find(|record| record.id == id)
    }

    /// Flip the favorite flag of `id` and return the new value.
    ///
    /// Returns `None` without touching storage when the id is not in the
    /// collection, e.g. because it was evicted.
    pub fn toggle_favorite(&mut self, id: RecordId) -> Option<bool> {
        let record = self.recipes.iter_mut().find(|record| record.id == id)?;
        record.is_favorite = !record.is_favorite;
        let is_favorite = record.is_favorite;

        self.persist();
        Some(is_favorite)
    }

    /// Remove every recipe
    pub fn clear_all(&mut self) {
        self.recipes.clear();
        self.persist();
    }

    /// The whole collection as a JSON array, identical to what is stored
    pub fn export_to_json(&self) -> Result<String> {
        export::to_json(&self.recipes)
    }

    /// The whole collection as a plain-text document, newest first
    pub fn export_to_text(&self) -> String {
        export::to_text(&self.recipes)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// True when the last write to storage failed
    pub fn is_mirror_stale(&self) -> bool {
        self.mirror_stale
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Millisecond timestamp, moved past the largest id already in use
    fn next_id(&self, created_at: DateTime<Utc>) -> RecordId {
        let candidate = created_at.timestamp_millis();
        let max = match self.recipes.iter().map(|record| record.id.0).max() {
            Some(max) if max >= candidate => max,
            _ => return RecordId(candidate),
        };

        if let Some(next) = max.checked_add(1) {
            return RecordId(next);
        }

        // Nothing left above the largest id; take the lowest free one instead
        let taken: HashSet<i64> = self.recipes.iter().map(|record| record.id.0).collect();
        RecordId((0..).find(|id| !taken.contains(id)).unwrap_or(candidate))
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.recipes)
            .map_err(ChomptronError::from)
            .and_then(|json| self.storage.set(STORAGE_KEY, &json));

        match result {
            Ok(()) => self.mirror_stale = false,
            Err(e) => {
                warn!("Could not persist recipe history: {}", e);
                self.mirror_stale = true;
            }
        }
    }
}

/// Decode stored history, dropping anything that breaks the collection's
/// invariants. Undecodable data yields an empty collection.
fn decode_history(raw: &str) -> Vec<RecipeRecord> {
    let decoded: Vec<RecipeRecord> = match serde_json::from_str(raw) {
        Ok(recipes) => recipes,
        Err(e) => {
            warn!("Stored recipe history is corrupt, starting empty: {}", e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut recipes: Vec<RecipeRecord> = decoded
        .into_iter()
        .filter(|record| seen.insert(record.id))
        .collect();
    recipes.truncate(MAX_RECIPES);
    recipes
}
