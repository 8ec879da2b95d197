//! Request pipeline of the recipe finder.
//!
//! [`RecipeContext`] holds the process-lifetime dependencies. Its
//! `search` and `surprise` methods run one request each and return the
//! outward [`recipe_model::RecipeResults`].

pub mod assemble;
pub mod context;
pub mod error;
pub mod pipeline;

#[cfg(test)]
mod testing;

pub use context::{RecipeContext, SearchKnobs};
pub use error::{PipelineError, Result};
