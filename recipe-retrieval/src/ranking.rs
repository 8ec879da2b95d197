//! Substring-count ranking of fetched candidates and the fallback decision.

use tracing::debug;

use crate::normalizer::normalize_token;
use crate::structs::ranked_candidate::{RankedCandidate, Ranking};
use crate::structs::stored_recipe::StoredRecipe;

/// Fallback policy applied after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub enabled: bool,
    /// Fallback fires when every score is below this. `1` means "all zero".
    pub min_score: u32,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            min_score: 1,
        }
    }
}

/// The candidate's normalized ingredient text, joined without separators.
fn ingredient_haystack(recipe: &StoredRecipe) -> String {
    recipe
        .ingredients_tokenized
        .iter()
        .map(|s| normalize_token(s))
        .collect()
}

/// Number of query tokens contained in `haystack`, counted per query token.
pub fn match_score(haystack: &str, query: &[String]) -> u32 {
    query.iter().filter(|t| haystack.contains(t.as_str())).count() as u32
}

/// Score and order `candidates` against normalized `query` tokens.
///
/// Sorting is stable: equal scores keep fetch order.
pub fn rank(candidates: Vec<StoredRecipe>, query: &[String], policy: FallbackPolicy) -> Ranking {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|recipe| {
            let score = match_score(&ingredient_haystack(&recipe), query);
            RankedCandidate { recipe, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let best = ranked.first().map_or(0, |c| c.score);
    let should_fallback = policy.enabled && best < policy.min_score;

    debug!(
        target: "recipe_retrieval::ranking",
        candidates = ranked.len(),
        best,
        should_fallback,
        "candidates ranked"
    );
    Ranking {
        ranked,
        should_fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i64, ingredients: &[&str]) -> StoredRecipe {
        StoredRecipe {
            id,
            name: format!("recipe {id}"),
            ingredients_tokenized: ingredients.iter().map(|s| s.to_string()).collect(),
            ..StoredRecipe::default()
        }
    }

    fn q(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    const ENABLED: FallbackPolicy = FallbackPolicy {
        enabled: true,
        min_score: 1,
    };

    #[test]
    fn counts_each_query_token_once() {
        let r = rank(
            vec![recipe(1, &["Chicken breast", "chicken stock", "Rice"])],
            &q(&["chicken", "rice", "chicken"]),
            FallbackPolicy::default(),
        );
        // "chicken" is counted per query occurrence, not per ingredient match.
        assert_eq!(r.ranked[0].score, 3);
    }

    #[test]
    fn matches_across_ingredient_boundaries() {
        // "salt" + "tomato" joins into "salttomato", which contains "tto".
        let r = rank(vec![recipe(1, &["salt", "tomato"])], &q(&["tto"]), ENABLED);
        assert_eq!(r.ranked[0].score, 1);
        assert!(!r.should_fallback);
    }

    #[test]
    fn orders_descending_and_keeps_fetch_order_on_ties() {
        let candidates = vec![
            recipe(1, &["beef"]),
            recipe(2, &["chicken", "rice"]),
            recipe(3, &["rice"]),
            recipe(4, &["chicken"]),
            recipe(5, &["rice", "chicken thighs"]),
        ];
        let r = rank(candidates, &q(&["chicken", "rice"]), FallbackPolicy::default());
        let ids: Vec<i64> = r.ranked.iter().map(|c| c.recipe.id).collect();
        assert_eq!(ids, vec![2, 5, 3, 4, 1]);
        assert!(r.ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn all_zero_triggers_fallback_only_when_enabled() {
        let candidates = || vec![recipe(1, &["beef"]), recipe(2, &["pork"])];
        let query = q(&["zzznonexistent999"]);

        assert!(rank(candidates(), &query, ENABLED).should_fallback);
        assert!(!rank(candidates(), &query, FallbackPolicy::default()).should_fallback);
    }

    #[test]
    fn a_single_nonzero_score_suppresses_fallback() {
        let candidates = vec![recipe(1, &["beef"]), recipe(2, &["pork"]), recipe(3, &["leek"])];
        let r = rank(candidates, &q(&["leek", "a", "b", "c"]), ENABLED);
        assert!(!r.should_fallback);
        assert_eq!(r.ranked[0].recipe.id, 3);
    }

    #[test]
    fn threshold_knob_raises_the_bar() {
        let policy = FallbackPolicy {
            enabled: true,
            min_score: 2,
        };
        let r = rank(vec![recipe(1, &["leek"])], &q(&["leek", "potato"]), policy);
        assert!(r.should_fallback);
    }

    #[test]
    fn empty_candidate_set_falls_back_when_enabled() {
        assert!(rank(Vec::new(), &q(&["rice"]), ENABLED).should_fallback);
    }

    #[test]
    fn candidate_ingredients_are_normalized_like_the_query() {
        let r = rank(
            vec![recipe(1, &["GARLIC, minced"])],
            &q(&["garlic minced"]),
            FallbackPolicy::default(),
        );
        assert_eq!(r.ranked[0].score, 1);
    }
}
