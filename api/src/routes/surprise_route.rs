use std::sync::Arc;

use axum::{
    Json,
    extract::{RawQuery, State},
};
use recipe_model::RecipeResults;
use tracing::{debug, instrument};

use crate::{
    app_state::AppState, error_handler::AppResult,
    routes::ingredients_query::ingredient_values,
};

/// `GET /surprise?ingredients=...`: one generated recipe; the values form
/// a theme.
#[instrument(name = "surprise_route", skip_all)]
pub async fn surprise_route(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<RecipeResults>> {
    let parts = ingredient_values(query.as_deref());
    debug!(parts = parts.len(), "surprise_route: start");

    let results = state.ctx.surprise(&parts).await?;
    Ok(Json(results))
}
