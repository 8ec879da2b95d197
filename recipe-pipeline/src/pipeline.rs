//! The two request flows.
//!
//! `search`: normalize → embed → similarity search → fetch → rank → either
//! assemble the top results or fall back to generation.
//! `surprise`: always generates from a theme.

use recipe_generator::GenerationRequest;
use recipe_model::RecipeResults;
use recipe_retrieval::RetrievalError;
use recipe_retrieval::normalizer::normalize;
use recipe_retrieval::ranking::rank;
use tracing::{debug, info, instrument};

use crate::assemble::{assemble_generated, assemble_retrieved};
use crate::context::RecipeContext;
use crate::error::Result;

impl RecipeContext {
    /// Recipes for raw user ingredients.
    ///
    /// # Errors
    /// - `InputInvalid` when nothing survives normalization
    /// - index, store and embedding failures as they come
    /// - generation failures when the fallback fires
    #[instrument(target = "recipe_pipeline", skip_all, fields(raw = raw.len()))]
    pub async fn search(&self, raw: &[String]) -> Result<RecipeResults> {
        let tokens = normalize(raw);
        if tokens.is_empty() {
            return Err(RetrievalError::InputInvalid("ingredients must not be empty".into()).into());
        }

        let vector = self.embedder.embed_tokens(&tokens).await?;
        let neighbors = self.index.search(&vector, self.knobs.top_k).await?;
        let ids: Vec<i64> = neighbors.iter().map(|n| n.id).collect();
        let candidates = self.store.fetch(&ids).await?;
        debug!(
            target: "recipe_pipeline",
            neighbors = neighbors.len(),
            candidates = candidates.len(),
            "candidates fetched"
        );

        let ranking = rank(candidates, &tokens, self.knobs.fallback);
        if ranking.should_fallback {
            info!(target: "recipe_pipeline", "no relevant candidate; generating a recipe");
            let recipe = self
                .generator
                .generate(&GenerationRequest::ingredients(raw.iter().cloned()))
                .await?;
            return Ok(assemble_generated(recipe));
        }

        Ok(assemble_retrieved(
            ranking.ranked,
            self.knobs.result_limit,
            self.images.as_ref(),
            self.store.as_ref(),
        )
        .await)
    }

    /// One generated recipe for free-form theme parts.
    ///
    /// # Errors
    /// Generation and repair failures.
    #[instrument(target = "recipe_pipeline", skip_all)]
    pub async fn surprise(&self, parts: &[String]) -> Result<RecipeResults> {
        let recipe = self.generator.generate(&GenerationRequest::theme(parts)).await?;
        Ok(assemble_generated(recipe))
    }
}
