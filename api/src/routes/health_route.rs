use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{Json, extract::State};
use serde::Serialize;
use tracing::debug;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Vectors in the similarity index, when the backend knows.
    pub index_len: Option<usize>,
    pub models: Vec<HealthStatus>,
}

/// `GET /health`: never fails; problems show up as `ok: false`.
pub async fn health_route(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let models = match &state.ctx.llm {
        Some(llm) => llm.health_all().await,
        None => Vec::new(),
    };
    let ok = models.iter().all(|m| m.ok);
    debug!(ok, models = models.len(), "health_route: done");

    Json(HealthResponse {
        ok,
        index_len: state.ctx.index.len(),
        models,
    })
}
