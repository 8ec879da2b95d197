//! Shared recipe schema: the outward recipe document and its nutrition block.

pub mod nutrition;
pub mod recipe;

pub use nutrition::{NUTRITION_KEYS, Nutrient, Nutrition, NutritionShape, STORE_NUTRITION_LEN};
pub use recipe::{AI_GENERATED_SOURCE, GENERATED_RECIPE_ID, Provenance, Recipe, RecipeResults};
