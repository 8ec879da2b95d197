use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `recipes` row as persisted by ingestion.
///
/// Array columns may be `NULL` for rows ingested from sparse sources;
/// they decode as empty vectors.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct StoredRecipe {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub instructions: Vec<String>,
    pub main_ingredients: Vec<String>,
    pub tags: Vec<String>,
    /// Positional nutrition values; seven entries for well-formed rows.
    pub nutrition: Vec<String>,
    pub total_time: String,
    pub image_url: Option<String>,
    pub ingredients_tokenized: Vec<String>,
    pub data_source: String,
}

impl StoredRecipe {
    /// `true` when the row still needs an image backfill.
    pub fn needs_image(&self) -> bool {
        self.image_url.as_deref().is_none_or(|u| u.trim().is_empty())
    }
}
