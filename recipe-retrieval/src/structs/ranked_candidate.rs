use serde::Serialize;

use crate::structs::stored_recipe::StoredRecipe;

/// A fetched candidate paired with its ingredient match score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub recipe: StoredRecipe,
    /// Number of query tokens found in the candidate's ingredient text.
    pub score: u32,
}

/// Output of the ranking step.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Candidates ordered by descending score, ties in fetch order.
    pub ranked: Vec<RankedCandidate>,
    /// Set when fallback is enabled and no candidate reached the threshold.
    pub should_fallback: bool,
}
