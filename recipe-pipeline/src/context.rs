//! Process-lifetime dependencies, built once and shared by every request.

use std::sync::Arc;

use ai_llm_service::config::default_config::{config_embedding, config_generation};
use ai_llm_service::service_profiles::LlmServiceProfiles;
use recipe_generator::{RecipeGenerator, RetryPolicy};
use recipe_retrieval::embedding::EmbeddingClient;
use recipe_retrieval::ranking::FallbackPolicy;
use recipe_retrieval::store::{PgRecipeStore, RecipeStore};
use recipe_retrieval::vector_index::SimilarityIndex;
use recipe_retrieval::{RetrievalConfig, open_index};
use services::{ImageLookup, UnsplashClient, UnsplashConfig};
use tracing::info;

use crate::error::Result;

/// Search knobs the pipeline reads per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchKnobs {
    pub top_k: usize,
    pub result_limit: usize,
    pub fallback: FallbackPolicy,
}

impl Default for SearchKnobs {
    fn default() -> Self {
        Self {
            top_k: 25,
            result_limit: 5,
            fallback: FallbackPolicy::default(),
        }
    }
}

/// Everything a request handler needs. Cheap to clone.
#[derive(Clone)]
pub struct RecipeContext {
    pub embedder: EmbeddingClient,
    pub index: Arc<dyn SimilarityIndex>,
    pub store: Arc<dyn RecipeStore>,
    pub generator: RecipeGenerator,
    pub images: Arc<dyn ImageLookup>,
    pub knobs: SearchKnobs,
    /// Model runtime, kept for health probes. `None` with test doubles.
    pub llm: Option<Arc<LlmServiceProfiles>>,
}

impl RecipeContext {
    /// Wire the production context from the environment.
    ///
    /// Loads the similarity index fully before returning; the store pool
    /// connects lazily.
    ///
    /// # Errors
    /// Any invalid setting, unreadable index artifact, or client setup failure.
    pub fn from_env() -> Result<Self> {
        let cfg = RetrievalConfig::from_env()?;
        let llm = Arc::new(LlmServiceProfiles::new(
            config_generation()?,
            config_embedding()?,
            Some(10),
        )?);

        let index = open_index(&cfg.index)?;
        let store: Arc<dyn RecipeStore> = Arc::new(PgRecipeStore::connect_lazy(&cfg.store)?);
        let images: Arc<dyn ImageLookup> = Arc::new(UnsplashClient::new(UnsplashConfig::from_env())?);
        let generator = RecipeGenerator::new(llm.clone(), images.clone(), RetryPolicy::from_env()?);

        let knobs = SearchKnobs {
            top_k: cfg.search.top_k,
            result_limit: cfg.search.result_limit,
            fallback: FallbackPolicy {
                enabled: cfg.search.fallback_enabled,
                min_score: cfg.search.fallback_min_score,
            },
        };
        info!(
            target: "recipe_pipeline",
            top_k = knobs.top_k,
            result_limit = knobs.result_limit,
            fallback = knobs.fallback.enabled,
            index_len = ?index.len(),
            "recipe context ready"
        );

        Ok(Self {
            embedder: EmbeddingClient::new(llm.clone(), cfg.embedding.dim),
            index,
            store,
            generator,
            images,
            knobs,
            llm: Some(llm),
        })
    }
}
