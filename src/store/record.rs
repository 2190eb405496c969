use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a saved recipe: the creation time in Unix milliseconds,
/// bumped forward when that value is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecordId)
    }
}

/// One saved recipe-generation result.
///
/// Field names serialize in camelCase so the stored history stays readable
/// by the companion web page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    pub id: RecordId,
    /// The ingredient list exactly as the user typed it
    pub ingredients: String,
    /// Full text returned by the generation provider
    pub recipe_text: String,
    /// Display name derived from `recipe_text` when the record was saved
    pub name: String,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}
