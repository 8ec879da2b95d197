use serde::{Deserialize, Serialize};

use crate::nutrition::Nutrition;

/// Id assigned to every generated recipe.
pub const GENERATED_RECIPE_ID: i64 = -1;

/// `source` value for generated recipes.
pub const AI_GENERATED_SOURCE: &str = "AI Generated";

/// Outward recipe document returned by both pipeline paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub steps: Vec<String>,
    pub ingredients: Vec<String>,
    pub tags: Vec<String>,
    pub nutrition: Nutrition,
    pub prep_time: String,
    pub image_url: String,
    pub ingredients_tokenized: Vec<String>,
    pub source: String,
    pub cuisine: String,
}

/// Provenance of a result set, used when assembling responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Retrieved,
    Generated,
}

/// Response envelope for `/search` and `/surprise`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeResults {
    pub results: Vec<Recipe>,
}
