//! Prompt builder for recipe synthesis.
//!
//! Both request shapes ask for the same JSON object so every response goes
//! through one repair and decode path.

/// Theme used by `/surprise` when the caller gives nothing.
pub const DEFAULT_THEME: &str = "Random Recipe please";

/// Object layout the model is asked to emit.
const SCHEMA_BLOCK: &str = r#"{
"generic_name": "concise dish name",
"description": "≤300 words",
"tags": ["tag1","tag2","tag3","tag4","tag5"],
"nutrition": {
    "calories": "",
    "total_fat": "",
    "sugar": "",
    "sodium": "",
    "protein": "",
    "saturated_fat": ""
},
"ingredient": ["ingredient1","ingredient2","ingredient3","ingredient4","ingredient5"],
"steps": ["step1","step2","step3","step4","step5"],
"cuisine": "cuisine type",
"prep_time": "e.g. 20 min"
}"#;

/// What the generated recipe should be built around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    /// Raw user ingredients, possibly misspelled.
    Ingredients(Vec<String>),
    /// Free-form idea or mood.
    Theme(String),
}

impl GenerationRequest {
    /// Ingredient request from raw caller strings; blanks are dropped.
    pub fn ingredients<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GenerationRequest::Ingredients(
            raw.into_iter()
                .map(Into::into)
                .map(|s: String| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Theme request from query values joined by spaces, or [`DEFAULT_THEME`].
    pub fn theme<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = parts
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            GenerationRequest::Theme(DEFAULT_THEME.to_string())
        } else {
            GenerationRequest::Theme(joined)
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationRequest::Ingredients(_) => "ingredients",
            GenerationRequest::Theme(_) => "theme",
        }
    }

    /// Full prompt text for the model.
    pub fn prompt(&self) -> String {
        match self {
            GenerationRequest::Ingredients(items) => format!(
                "You are a professional chef-bot.\n\n\
                 Ingredients (may contain typos): {}\n\n\
                 Return ONLY valid JSON, **no markdown fences, no extra keys**:\n\n{SCHEMA_BLOCK}",
                items.join(", ")
            ),
            GenerationRequest::Theme(theme) => format!(
                "You are a professional chef-bot.\n\n\
                 The user says: \"{}\"\n\n\
                 Invent ONE original recipe whose *flavour, presentation, or story* evokes that idea. \
                 Assume you have a full pantry; you may choose any ingredients.\n\n\
                 Return ONLY valid JSON, no markdown fences, no commentary, exactly these keys:\n\n{SCHEMA_BLOCK}",
                theme.trim()
            ),
        }
    }
}
