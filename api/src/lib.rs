use std::sync::Arc;

pub mod app_state;
pub mod error_handler;
mod routes;

use axum::{Router, routing::get};
use recipe_pipeline::RecipeContext;
use tokio::signal;
use tracing::{info, warn};

use crate::{
    app_state::AppState,
    error_handler::AppError,
    routes::{
        health_route::health_route, search_route::search_route, surprise_route::surprise_route,
    },
};

/// Routes over an already built state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", get(search_route))
        .route("/surprise", get(surprise_route))
        .route("/health", get(health_route))
        .with_state(state)
}

/// Build the context from the environment, bind `API_ADDRESS` and serve
/// until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = std::env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "0.0.0.0:5000".to_string());

    let ctx = RecipeContext::from_env().map_err(AppError::Startup)?;
    let app = router(Arc::new(AppState::new(ctx)));

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "recipe finder listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{AiLlmError, TextEmbedder, TextGenerator};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use recipe_generator::{RecipeGenerator, RetryPolicy};
    use recipe_pipeline::SearchKnobs;
    use recipe_retrieval::embedding::EmbeddingClient;
    use recipe_retrieval::ranking::FallbackPolicy;
    use recipe_retrieval::store::RecipeStore;
    use recipe_retrieval::vector_index::{Neighbor, SimilarityIndex};
    use recipe_retrieval::{RetrievalError, StoredRecipe};
    use serde_json::Value;
    use services::NoImageLookup;
    use std::time::Duration;
    use tower::ServiceExt;

    struct OnesEmbedder;

    #[async_trait]
    impl TextEmbedder for OnesEmbedder {
        async fn embed(&self, _text: &str) -> ai_llm_service::Result<Vec<f32>> {
            Ok(vec![1.0; 3])
        }
    }

    struct TwoRows;

    #[async_trait]
    impl SimilarityIndex for TwoRows {
        async fn search(&self, _v: &[f32], k: usize) -> Result<Vec<Neighbor>, RetrievalError> {
            Ok((0..k)
                .map(|i| Neighbor {
                    id: if i == 0 { 1 } else { 2 },
                    distance: i as f32,
                })
                .collect())
        }

        fn len(&self) -> Option<usize> {
            Some(2)
        }
    }

    struct Rows;

    #[async_trait]
    impl RecipeStore for Rows {
        async fn fetch(&self, _ids: &[i64]) -> Result<Vec<StoredRecipe>, RetrievalError> {
            Ok(vec![
                StoredRecipe {
                    id: 1,
                    name: "Beef Stew".into(),
                    ingredients_tokenized: vec!["beef".into()],
                    image_url: Some("https://img.example/1.jpg".into()),
                    ..StoredRecipe::default()
                },
                StoredRecipe {
                    id: 2,
                    name: "Chicken Rice".into(),
                    ingredients_tokenized: vec!["chicken".into(), "rice".into()],
                    image_url: Some("https://img.example/2.jpg".into()),
                    ..StoredRecipe::default()
                },
            ])
        }

        async fn update_image_url(&self, _id: i64, _url: &str) -> Result<(), RetrievalError> {
            Ok(())
        }
    }

    struct BrokenModel;

    #[async_trait]
    impl TextGenerator for BrokenModel {
        async fn generate(&self, _prompt: &str) -> ai_llm_service::Result<String> {
            Err(AiLlmError::Decode("model returned garbage".into()))
        }
    }

    fn app() -> Router {
        let ctx = RecipeContext {
            embedder: EmbeddingClient::new(Arc::new(OnesEmbedder), 3),
            index: Arc::new(TwoRows),
            store: Arc::new(Rows),
            generator: RecipeGenerator::new(
                Arc::new(BrokenModel),
                Arc::new(NoImageLookup),
                RetryPolicy {
                    max_attempts: 1,
                    base_backoff: Duration::from_millis(1),
                    attempt_timeout: Duration::from_secs(1),
                },
            ),
            images: Arc::new(NoImageLookup),
            knobs: SearchKnobs {
                top_k: 10,
                result_limit: 5,
                fallback: FallbackPolicy::default(),
            },
            llm: None,
        };
        router(Arc::new(AppState::new(ctx)))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let resp = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn search_returns_ranked_results() {
        let (status, body) = get_json("/search?ingredients=chicken&ingredients=rice").await;
        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["id"], 2);
        assert_eq!(results[0]["cuisine"], "");
        assert!(results[0]["nutrition"].get("saturated_fat").is_some());
    }

    #[tokio::test]
    async fn search_without_ingredients_is_400() {
        let (status, body) = get_json("/search").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn punctuation_only_ingredients_are_input_invalid() {
        let (status, body) = get_json("/search?ingredients=%21%21%21").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INPUT_INVALID");
    }

    #[tokio::test]
    async fn failed_generation_is_a_structured_502() {
        let (status, body) = get_json("/surprise?ingredients=rainy&ingredients=day").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "GENERATION_FAILED");
        assert!(body.get("results").is_none());
    }

    #[tokio::test]
    async fn health_reports_index_size() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["index_len"], 2);
    }
}
