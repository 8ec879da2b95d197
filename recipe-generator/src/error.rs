//! Typed error for the recipe-generator crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Every attempt failed, or a failure was not worth retrying.
    #[error("generation failed after {attempts} attempt(s): {reason}")]
    GenerationFailed { attempts: u32, reason: String },

    /// The output contained no brace-delimited object at all.
    #[error("no JSON object found in model output")]
    NoJsonFound,

    /// The extracted object survived neither the strict nor the permissive parser.
    #[error("model output is not parseable: {0}")]
    Unparseable(String),
}
