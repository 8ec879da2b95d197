use std::sync::Arc;

use axum::{
    Json,
    extract::{RawQuery, State},
};
use recipe_model::RecipeResults;
use tracing::{debug, instrument};

use crate::{
    app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::ingredients_query::ingredient_values,
};

/// `GET /search?ingredients=...`: ranked retrieval with generative fallback.
#[instrument(name = "search_route", skip_all)]
pub async fn search_route(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<RecipeResults>> {
    let ingredients = ingredient_values(query.as_deref());
    if ingredients.iter().all(|s| s.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "at least one `ingredients` value is required".into(),
        ));
    }
    debug!(count = ingredients.len(), "search_route: start");

    let results = state.ctx.search(&ingredients).await?;

    debug!(results = results.results.len(), "search_route: success");
    Ok(Json(results))
}
