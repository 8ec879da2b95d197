//! Response assembler: one outward schema for both pipeline paths.

use recipe_model::{Nutrition, Provenance, Recipe, RecipeResults};
use recipe_retrieval::RankedCandidate;
use recipe_retrieval::StoredRecipe;
use recipe_retrieval::store::RecipeStore;
use services::ImageLookup;
use tracing::{debug, warn};

/// Map a stored row onto the outward schema. `cuisine` is not stored.
pub fn to_recipe(row: StoredRecipe) -> Recipe {
    Recipe {
        id: row.id,
        name: row.name,
        description: row.description,
        steps: row.instructions,
        ingredients: row.main_ingredients,
        tags: row.tags,
        nutrition: Nutrition::from_store(&row.nutrition),
        prep_time: row.total_time,
        image_url: row.image_url.unwrap_or_default(),
        ingredients_tokenized: row.ingredients_tokenized,
        source: row.data_source,
        cuisine: String::new(),
    }
}

/// Look up and persist an image for `row` when it has none.
///
/// Lookup and write-back failures are logged and the row stays without an
/// image. The URL is only attached once the store accepted it.
pub async fn backfill_image(row: &mut StoredRecipe, images: &dyn ImageLookup, store: &dyn RecipeStore) {
    if !row.needs_image() {
        return;
    }
    let url = match images.lookup(&row.name).await {
        Ok(url) => url,
        Err(e) => {
            warn!(target: "recipe_pipeline::assemble", recipe_id = row.id, error = %e, "image lookup failed");
            return;
        }
    };
    if url.is_empty() {
        debug!(target: "recipe_pipeline::assemble", recipe_id = row.id, "no image found");
        return;
    }
    match store.update_image_url(row.id, &url).await {
        Ok(()) => row.image_url = Some(url),
        Err(e) => {
            warn!(target: "recipe_pipeline::assemble", recipe_id = row.id, error = %e, "image write-back failed");
        }
    }
}

/// Top `limit` ranked candidates, image-backfilled, in ranked order.
pub async fn assemble_retrieved(
    ranked: Vec<RankedCandidate>,
    limit: usize,
    images: &dyn ImageLookup,
    store: &dyn RecipeStore,
) -> RecipeResults {
    let mut results = Vec::with_capacity(limit.min(ranked.len()));
    for candidate in ranked.into_iter().take(limit) {
        let mut row = candidate.recipe;
        backfill_image(&mut row, images, store).await;
        results.push(to_recipe(row));
    }
    debug!(
        target: "recipe_pipeline::assemble",
        provenance = ?Provenance::Retrieved,
        results = results.len(),
        "response assembled"
    );
    RecipeResults { results }
}

/// Wrap the generated recipe as a one-element result list.
pub fn assemble_generated(recipe: Recipe) -> RecipeResults {
    debug!(
        target: "recipe_pipeline::assemble",
        provenance = ?Provenance::Generated,
        "response assembled"
    );
    RecipeResults {
        results: vec![recipe],
    }
}
