//! Generative recipe fallback.
//!
//! - [`prompt`]: request shapes and prompt text
//! - [`retry`]: bounded retry with exponential backoff
//! - [`repair`] and [`literal`]: turn raw model text into a JSON object
//! - [`decode`]: object to [`recipe_model::Recipe`]
//! - [`generator::RecipeGenerator`]: all of the above plus image lookup

pub mod decode;
pub mod error;
pub mod generator;
pub mod literal;
pub mod prompt;
pub mod repair;
pub mod retry;

pub use error::{GeneratorError, Result};
pub use generator::RecipeGenerator;
pub use prompt::{DEFAULT_THEME, GenerationRequest};
pub use retry::{AttemptStatus, GenerationAttempt, RetryPolicy};
