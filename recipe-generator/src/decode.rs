//! Turn a repaired model object into a [`Recipe`].
//!
//! Loosely typed fields are resolved through small variant types so that
//! every accepted shape is a named branch.

use recipe_model::{AI_GENERATED_SOURCE, GENERATED_RECIPE_ID, Nutrition, NutritionShape, Recipe};
use serde_json::{Map, Value};

/// Where the ingredient list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientList {
    /// Non-empty `ingredients` key.
    Plural(Vec<String>),
    /// `ingredient` key, as the prompt asks for.
    Singular(Vec<String>),
    /// Neither key carried anything.
    Missing,
}

impl IngredientList {
    /// `ingredients` wins when it is non-empty; otherwise `ingredient`.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        let plural = obj.get("ingredients").map(string_list).unwrap_or_default();
        if !plural.is_empty() {
            return IngredientList::Plural(plural);
        }
        match obj.get("ingredient").map(string_list) {
            Some(items) if !items.is_empty() => IngredientList::Singular(items),
            _ => IngredientList::Missing,
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            IngredientList::Plural(v) | IngredientList::Singular(v) => v,
            IngredientList::Missing => Vec::new(),
        }
    }
}

/// Render a scalar as text; `null` is empty, containers are JSON text.
fn text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Lists keep their non-blank items as text; a single string is one item.
fn string_list(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items
            .iter()
            .map(text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Null => Vec::new(),
        other => {
            let s = text(other);
            if s.is_empty() { Vec::new() } else { vec![s] }
        }
    }
}

/// Tags may arrive as one comma-separated string.
fn tag_list(v: &Value) -> Vec<String> {
    match v {
        Value::String(s) => s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        other => string_list(other),
    }
}

fn field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(text).unwrap_or_default()
}

/// Build the outward recipe for a generated object.
///
/// `id` is always [`GENERATED_RECIPE_ID`] and `source` is
/// [`AI_GENERATED_SOURCE`], whatever the object says.
pub fn decode_generated(obj: &Map<String, Value>) -> Recipe {
    let ingredients = IngredientList::from_object(obj).into_vec();
    let name = match field(obj, "generic_name") {
        n if n.is_empty() => field(obj, "name"),
        n => n,
    };

    Recipe {
        id: GENERATED_RECIPE_ID,
        name,
        description: field(obj, "description"),
        steps: obj.get("steps").map(string_list).unwrap_or_default(),
        ingredients_tokenized: ingredients.clone(),
        ingredients,
        tags: obj.get("tags").map(tag_list).unwrap_or_default(),
        nutrition: Nutrition::from_generated(NutritionShape::from(obj.get("nutrition").cloned())),
        prep_time: field(obj, "prep_time"),
        image_url: field(obj, "image_url"),
        source: AI_GENERATED_SOURCE.to_string(),
        cuisine: field(obj, "cuisine"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_model::Nutrient;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn full_object_decodes_with_forced_identity() {
        let r = decode_generated(&obj(json!({
            "id": 42,
            "source": "somewhere",
            "generic_name": "Leek Tart",
            "description": "Buttery.",
            "tags": ["french", "tart"],
            "nutrition": {"calories": "300", "protein": "8g"},
            "ingredient": ["leek", "butter"],
            "steps": ["bake"],
            "cuisine": "French",
            "prep_time": "45 min"
        })));
        assert_eq!(r.id, GENERATED_RECIPE_ID);
        assert_eq!(r.source, AI_GENERATED_SOURCE);
        assert_eq!(r.name, "Leek Tart");
        assert_eq!(r.ingredients, vec!["leek", "butter"]);
        assert_eq!(r.ingredients_tokenized, r.ingredients);
        assert_eq!(r.cuisine, "French");
        assert_eq!(r.prep_time, "45 min");
        assert_eq!(r.nutrition.calories, Nutrient::from("300"));
        assert!(r.nutrition.sugar.is_empty());
        assert!(r.image_url.is_empty());
    }

    #[test]
    fn ingredient_key_variants() {
        let plural = obj(json!({"ingredients": ["a"], "ingredient": ["b"]}));
        assert_eq!(
            IngredientList::from_object(&plural),
            IngredientList::Plural(vec!["a".into()])
        );

        let empty_plural = obj(json!({"ingredients": [], "ingredient": ["b"]}));
        assert_eq!(
            IngredientList::from_object(&empty_plural),
            IngredientList::Singular(vec!["b".into()])
        );

        assert_eq!(
            IngredientList::from_object(&obj(json!({}))),
            IngredientList::Missing
        );
    }

    #[test]
    fn loose_scalars_are_coerced() {
        let r = decode_generated(&obj(json!({
            "name": "Fallback Name",
            "tags": "quick, easy ,",
            "steps": "Mix everything.",
            "prep_time": 20,
            "cuisine": null,
            "nutrition": ["100", "1g"]
        })));
        assert_eq!(r.name, "Fallback Name");
        assert_eq!(r.tags, vec!["quick", "easy"]);
        assert_eq!(r.steps, vec!["Mix everything."]);
        assert_eq!(r.prep_time, "20");
        assert_eq!(r.cuisine, "");
        assert_eq!(r.nutrition.calories, Nutrient::from("100"));
        assert_eq!(r.nutrition.total_fat, Nutrient::from("1g"));
        assert!(r.nutrition.saturated_fat.is_empty());
        assert!(r.ingredients.is_empty());
    }

    #[test]
    fn provided_image_url_is_kept() {
        let r = decode_generated(&obj(json!({
            "generic_name": "Soup",
            "image_url": "https://img.example/soup.jpg"
        })));
        assert_eq!(r.image_url, "https://img.example/soup.jpg");
    }
}
