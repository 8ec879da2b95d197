use recipe_pipeline::RecipeContext;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-lifetime pipeline dependencies.
    pub ctx: RecipeContext,
}

impl AppState {
    pub fn new(ctx: RecipeContext) -> Self {
        Self { ctx }
    }
}
