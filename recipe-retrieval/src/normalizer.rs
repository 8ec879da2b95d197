//! Ingredient text normalization shared by the embedding and ranking paths.

/// Lowercase `raw`, keep only alphanumerics and whitespace, trim.
pub fn normalize_token(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalize every input string and drop blank results.
///
/// A single string is normalized by passing it as a one-element slice:
///
/// ```
/// use recipe_retrieval::normalizer::normalize;
/// assert_eq!(normalize(["Chicken Breast!"]), vec!["chicken breast"]);
/// ```
pub fn normalize<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter(|s| !s.as_ref().trim().is_empty())
        .map(|s| normalize_token(s.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Text handed to the embedder: normalized tokens joined by single spaces.
pub fn embedding_text(tokens: &[String]) -> String {
    tokens.join(" ")
}
