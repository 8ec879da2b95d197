//! Nutrition schema and the decoders that reshape loosely typed sources
//! into it.
//!
//! Two sources exist:
//! - generated JSON, where `nutrition` may be an object, a positional list,
//!   a scalar or missing ([`NutritionShape`]);
//! - the store's positional text array, which only carries meaning when it
//!   has exactly [`STORE_NUTRITION_LEN`] elements ([`Nutrition::from_store`]).
//!
//! Whatever the source, the result always has exactly six named keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Outward key order; also the positional order used by generated lists.
pub const NUTRITION_KEYS: [&str; 6] = [
    "calories",
    "total_fat",
    "sugar",
    "sodium",
    "protein",
    "saturated_fat",
];

/// Length of the store's positional nutrition array.
pub const STORE_NUTRITION_LEN: usize = 7;

/// Key for each of the first six store positions. Position 7 has no key.
// The seventh element is dropped. It is unclear whether it is an unused
// column or schema drift; keep the drop until the ingestion side says.
const STORE_POSITIONS: [&str; 6] = [
    "calories",
    "protein",
    "saturated_fat",
    "sodium",
    "sugar",
    "total_fat",
];

/// A single nutrition value, kept as the source emitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nutrient {
    Number(Number),
    Text(String),
}

impl Default for Nutrient {
    fn default() -> Self {
        Nutrient::Text(String::new())
    }
}

impl Nutrient {
    /// `true` for the empty-string placeholder.
    pub fn is_empty(&self) -> bool {
        matches!(self, Nutrient::Text(s) if s.is_empty())
    }
}

impl From<Value> for Nutrient {
    fn from(v: Value) -> Self {
        match v {
            Value::Number(n) => Nutrient::Number(n),
            Value::String(s) => Nutrient::Text(s),
            Value::Null => Nutrient::default(),
            Value::Bool(b) => Nutrient::Text(b.to_string()),
            other @ (Value::Array(_) | Value::Object(_)) => Nutrient::Text(other.to_string()),
        }
    }
}

impl From<&str> for Nutrient {
    fn from(s: &str) -> Self {
        Nutrient::Text(s.to_string())
    }
}

/// Exactly six named nutrition fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrition {
    pub calories: Nutrient,
    pub total_fat: Nutrient,
    pub sugar: Nutrient,
    pub sodium: Nutrient,
    pub protein: Nutrient,
    pub saturated_fat: Nutrient,
}

impl Nutrition {
    /// Mutable slot for a canonical key; `None` for unknown keys.
    fn slot_mut(&mut self, key: &str) -> Option<&mut Nutrient> {
        match key {
            "calories" => Some(&mut self.calories),
            "total_fat" => Some(&mut self.total_fat),
            "sugar" => Some(&mut self.sugar),
            "sodium" => Some(&mut self.sodium),
            "protein" => Some(&mut self.protein),
            "saturated_fat" => Some(&mut self.saturated_fat),
            _ => None,
        }
    }

    /// Reshapes generated nutrition of any shape.
    pub fn from_generated(shape: NutritionShape) -> Self {
        let mut out = Nutrition::default();
        match shape {
            NutritionShape::Object(map) => {
                for (k, v) in map {
                    if let Some(slot) = out.slot_mut(&canonical_key(&k)) {
                        *slot = Nutrient::from(v);
                    }
                }
            }
            NutritionShape::Positional(values) => {
                for (key, v) in NUTRITION_KEYS.iter().zip(values) {
                    if let Some(slot) = out.slot_mut(key) {
                        *slot = Nutrient::from(v);
                    }
                }
            }
            NutritionShape::Scalar(_) | NutritionShape::Absent => {}
        }
        out
    }

    /// Reshapes the store's positional text array.
    ///
    /// Only a [`STORE_NUTRITION_LEN`]-element array is mapped; anything
    /// else yields empty fields.
    pub fn from_store(values: &[String]) -> Self {
        let mut out = Nutrition::default();
        if values.len() != STORE_NUTRITION_LEN {
            if !values.is_empty() {
                warn!(
                    target: "recipe_model::nutrition",
                    len = values.len(),
                    "stored nutrition has unexpected length; emitting empty fields"
                );
            }
            return out;
        }
        for (key, v) in STORE_POSITIONS.iter().zip(values) {
            if let Some(slot) = out.slot_mut(key) {
                *slot = Nutrient::Text(v.clone());
            }
        }
        out
    }
}

/// Every shape a generated `nutrition` field has been seen in.
#[derive(Debug, Clone, PartialEq)]
pub enum NutritionShape {
    /// `{"calories": "200", ...}`, possibly partial or with extra keys.
    Object(Map<String, Value>),
    /// `["200", "10g", ...]`, mapped in [`NUTRITION_KEYS`] order.
    Positional(Vec<Value>),
    /// A string, number or bool where a structure was expected.
    Scalar(Value),
    /// Missing or `null`.
    Absent,
}

impl From<Option<Value>> for NutritionShape {
    fn from(v: Option<Value>) -> Self {
        match v {
            None | Some(Value::Null) => NutritionShape::Absent,
            Some(Value::Object(m)) => NutritionShape::Object(m),
            Some(Value::Array(a)) => NutritionShape::Positional(a),
            Some(s @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => {
                NutritionShape::Scalar(s)
            }
        }
    }
}

/// `"Total Fat"` / `"total-fat"` → `"total_fat"`.
fn canonical_key(k: &str) -> String {
    k.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys_of(n: &Nutrition) -> Vec<String> {
        let v = serde_json::to_value(n).unwrap();
        let mut keys: Vec<String> = v.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn expected_keys() -> Vec<String> {
        let mut k: Vec<String> = NUTRITION_KEYS.iter().map(|s| s.to_string()).collect();
        k.sort();
        k
    }

    #[test]
    fn every_shape_yields_exactly_six_keys() {
        let inputs = vec![
            None,
            Some(Value::Null),
            Some(json!("n/a")),
            Some(json!({"calories": "250"})),
            Some(json!({"calories": 1, "fiber": "3g", "protein": "9g"})),
            Some(json!(["1", "2", "3", "4", "5", "6"])),
            Some(json!(["1", "2", "3", "4", "5", "6", "7"])),
            Some(json!(["1"])),
        ];
        for input in inputs {
            let n = Nutrition::from_generated(NutritionShape::from(input.clone()));
            assert_eq!(keys_of(&n), expected_keys(), "input: {input:?}");
        }
        for len in [0usize, 6, 7, 9] {
            let values: Vec<String> = (0..len).map(|i| i.to_string()).collect();
            assert_eq!(keys_of(&Nutrition::from_store(&values)), expected_keys());
        }
    }

    #[test]
    fn partial_object_fills_missing_with_empty() {
        let n = Nutrition::from_generated(NutritionShape::from(Some(json!({
            "calories": "420 kcal",
            "Total Fat": "12g",
            "fiber": "5g"
        }))));
        assert_eq!(n.calories, Nutrient::from("420 kcal"));
        assert_eq!(n.total_fat, Nutrient::from("12g"));
        assert!(n.sugar.is_empty());
        assert!(n.saturated_fat.is_empty());
    }

    #[test]
    fn generated_list_maps_positionally() {
        let n = Nutrition::from_generated(NutritionShape::from(Some(json!([
            "300", "10g", "4g", 500, "20g"
        ]))));
        assert_eq!(n.calories, Nutrient::from("300"));
        assert_eq!(n.total_fat, Nutrient::from("10g"));
        assert_eq!(n.sugar, Nutrient::from("4g"));
        assert_eq!(n.sodium, Nutrient::Number(500.into()));
        assert_eq!(n.protein, Nutrient::from("20g"));
        assert!(n.saturated_fat.is_empty());
    }

    #[test]
    fn scalar_and_absent_are_all_empty() {
        for shape in [NutritionShape::Absent, NutritionShape::Scalar(json!("unknown"))] {
            assert_eq!(Nutrition::from_generated(shape), Nutrition::default());
        }
    }

    #[test]
    fn store_array_uses_store_order_and_drops_seventh() {
        let values: Vec<String> = ["51.5", "0.0", "13.0", "0.0", "2.0", "0.0", "4.0"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let n = Nutrition::from_store(&values);
        assert_eq!(n.calories, Nutrient::from("51.5"));
        assert_eq!(n.protein, Nutrient::from("0.0"));
        assert_eq!(n.saturated_fat, Nutrient::from("13.0"));
        assert_eq!(n.sodium, Nutrient::from("0.0"));
        assert_eq!(n.sugar, Nutrient::from("2.0"));
        assert_eq!(n.total_fat, Nutrient::from("0.0"));
        let json = serde_json::to_string(&n).unwrap();
        assert!(!json.contains("4.0"));
    }

    #[test]
    fn store_array_of_other_length_is_empty() {
        let values: Vec<String> = vec!["1".into(); 6];
        assert_eq!(Nutrition::from_store(&values), Nutrition::default());
    }

    #[test]
    fn numbers_serialize_as_numbers() {
        let n = Nutrition {
            calories: Nutrient::Number(320.into()),
            ..Nutrition::default()
        };
        let v = serde_json::to_value(&n).unwrap();
        assert_eq!(v["calories"], json!(320));
        assert_eq!(v["sugar"], json!(""));
    }
}
