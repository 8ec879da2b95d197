//! Generative fallback client: prompt, retry, repair, decode, image fill.

use std::sync::Arc;

use ai_llm_service::TextGenerator;
use recipe_model::Recipe;
use services::ImageLookup;
use tracing::{info, instrument, warn};

use crate::decode::decode_generated;
use crate::error::Result;
use crate::prompt::GenerationRequest;
use crate::repair::repair_and_parse;
use crate::retry::{RetryPolicy, run_with_retry};

#[derive(Clone)]
pub struct RecipeGenerator {
    generator: Arc<dyn TextGenerator>,
    images: Arc<dyn ImageLookup>,
    policy: RetryPolicy,
}

impl RecipeGenerator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        images: Arc<dyn ImageLookup>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            generator,
            images,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Produce one recipe for `request`.
    ///
    /// The recipe is never persisted. A blank `image_url` is looked up by
    /// name; lookup failures leave it empty.
    ///
    /// # Errors
    /// - `GenerationFailed` when the model cannot be reached in time
    /// - `NoJsonFound` / `Unparseable` when its output cannot be repaired
    #[instrument(target = "recipe_generator", skip_all, fields(kind = request.kind()))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Recipe> {
        let outcome = run_with_retry(self.generator.as_ref(), &request.prompt(), self.policy).await?;
        let object = repair_and_parse(&outcome.text)?;
        let mut recipe = decode_generated(&object);

        if recipe.image_url.trim().is_empty() {
            recipe.image_url = match self.images.lookup(&recipe.name).await {
                Ok(url) => url,
                Err(e) => {
                    warn!(target: "recipe_generator", error = %e, "image lookup failed; leaving image empty");
                    String::new()
                }
            };
        }

        info!(
            target: "recipe_generator",
            attempts = outcome.attempts.len(),
            name = %recipe.name,
            has_image = !recipe.image_url.is_empty(),
            "recipe generated"
        );
        Ok(recipe)
    }
}
