//! `?ingredients=a&ingredients=b` decoding.
//!
//! The key may repeat, so the raw query string is decoded directly instead
//! of through a typed `Query<T>`.

use url::form_urlencoded;

pub const INGREDIENTS_KEY: &str = "ingredients";

/// All values of the `ingredients` key, in order, percent-decoded.
pub fn ingredient_values(raw_query: Option<&str>) -> Vec<String> {
    raw_query
        .map(|q| {
            form_urlencoded::parse(q.as_bytes())
                .filter(|(k, _)| k == INGREDIENTS_KEY)
                .map(|(_, v)| v.into_owned())
                .collect()
        })
        .unwrap_or_default()
}
