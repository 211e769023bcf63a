use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Treat `null` the same as an absent field (partial API payloads)
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize likes from int, float, numeric string or null
fn deserialize_likes<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LikesValue {
        Int(i64),
        Float(f64),
        String(String),
        Null,
    }

    Ok(match LikesValue::deserialize(deserializer)? {
        LikesValue::Int(i) => Some(i),
        LikesValue::Float(f) => Some(f as i64),
        LikesValue::String(s) => s.trim().parse::<i64>().ok(),
        LikesValue::Null => None,
    })
}

/// A recipe as returned by the external "find by ingredients" search.
///
/// Only the ingredient-match arrays and `likes` are consumed by ranking;
/// every other field of the payload is kept in `extra` and written back
/// out untouched. The three annotation fields are filled in by
/// [`IntelligenceRanker`](crate::ranking::IntelligenceRanker).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecipeRecord {
    /// Provider recipe ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Recipe title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Image URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,

    /// User ingredients this recipe uses (entries are opaque, only counted)
    #[serde(rename = "usedIngredients", default, deserialize_with = "null_as_default")]
    pub used_ingredients: Vec<Value>,

    /// Ingredients the recipe needs that the user did not list
    #[serde(rename = "missedIngredients", default, deserialize_with = "null_as_default")]
    pub missed_ingredients: Vec<Value>,

    /// Popularity signal
    #[serde(default, deserialize_with = "deserialize_likes", skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_count: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_count: Option<usize>,

    /// Ranking score, may be negative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intelligence_score: Option<i64>,

    /// Remaining payload fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecipeRecord {
    /// Create a bare record with an id and title
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builder-style helper used by providers and tests
    pub fn with_counts(mut self, used: usize, missed: usize) -> Self {
        self.used_ingredients = vec![Value::Null; used];
        self.missed_ingredients = vec![Value::Null; missed];
        self
    }

    pub fn with_likes(mut self, likes: i64) -> Self {
        self.likes = Some(likes);
        self
    }

    /// Likes, absent treated as zero
    pub fn likes_or_zero(&self) -> i64 {
        self.likes.unwrap_or(0)
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        match (self.id, self.intelligence_score) {
            (Some(id), Some(score)) => format!("{} [{}] score={}", self.title, id, score),
            (Some(id), None) => format!("{} [{}]", self.title, id),
            _ => self.title.clone(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Full recipe information from the provider's detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecipeDetail {
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,

    #[serde(rename = "readyInMinutes", default)]
    pub ready_in_minutes: Option<i64>,

    #[serde(default)]
    pub servings: Option<i64>,

    /// HTML summary as supplied by the provider
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub instructions: Option<String>,

    #[serde(rename = "sourceUrl", default)]
    pub source_url: Option<String>,

    #[serde(rename = "extendedIngredients", default, deserialize_with = "null_as_default")]
    pub extended_ingredients: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecipeDetail {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_find_by_ingredients_payload() {
        let json = r#"{
            "id": 641803,
            "title": "Easy & Delish! ~ Apple Crumble ~",
            "image": "https://img.spoonacular.com/recipes/641803-312x231.jpg",
            "usedIngredientCount": 3,
            "missedIngredientCount": 1,
            "usedIngredients": [{"name": "apples"}, {"name": "flour"}, {"name": "sugar"}],
            "missedIngredients": [{"name": "butter"}],
            "likes": 1
        }"#;

        let recipe = RecipeRecord::from_json(json).unwrap();
        assert_eq!(recipe.id, Some(641803));
        assert_eq!(recipe.used_ingredients.len(), 3);
        assert_eq!(recipe.missed_ingredients.len(), 1);
        assert_eq!(recipe.likes, Some(1));
        assert_eq!(recipe.extra.get("usedIngredientCount"), Some(&Value::from(3)));
    }

    #[test]
    fn test_partial_payload_defaults() {
        let recipe = RecipeRecord::from_json(r#"{"title": "Toast", "usedIngredients": null}"#).unwrap();
        assert!(recipe.used_ingredients.is_empty());
        assert!(recipe.missed_ingredients.is_empty());
        assert_eq!(recipe.likes, None);
        assert_eq!(recipe.likes_or_zero(), 0);

        let recipe = RecipeRecord::from_json(
            r#"{"id": 1, "title": null, "image": null, "usedIngredients": [1], "missedIngredients": null, "likes": null}"#,
        )
        .unwrap();
        assert_eq!(recipe.id, Some(1));
        assert_eq!(recipe.title, "");
        assert_eq!(recipe.image, "");
        assert_eq!(recipe.used_ingredients.len(), 1);

        let detail: RecipeDetail =
            serde_json::from_str(r#"{"id": 7, "title": null, "image": null, "extendedIngredients": null}"#).unwrap();
        assert_eq!(detail.id, 7);
        assert!(detail.title.is_empty());
        assert!(detail.image.is_empty());
        assert!(detail.extended_ingredients.is_empty());
    }

    #[test]
    fn test_one_partial_record_keeps_the_batch() {
        let json = r#"[
            {"id": 1, "title": "Omelette", "usedIngredients": [{}, {}]},
            {"id": 2, "title": null, "image": null}
        ]"#;

        let recipes: Vec<RecipeRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].used_ingredients.len(), 2);
        assert_eq!(recipes[1].title, "");
    }

    #[test]
    fn test_lenient_likes() {
        let recipe = RecipeRecord::from_json(r#"{"likes": "72"}"#).unwrap();
        assert_eq!(recipe.likes, Some(72));

        let recipe = RecipeRecord::from_json(r#"{"likes": 12.0}"#).unwrap();
        assert_eq!(recipe.likes, Some(12));
    }

    #[test]
    fn test_unknown_fields_survive_serialization() {
        let recipe = RecipeRecord::from_json(r#"{"id": 1, "imageType": "jpg"}"#).unwrap();
        let json = recipe.to_json().unwrap();
        assert!(json.contains("\"imageType\":\"jpg\""));
        assert!(!json.contains("intelligence_score"));
    }

    #[test]
    fn test_parse_detail() {
        let json = r#"{
            "id": 716429,
            "title": "Pasta with Garlic",
            "readyInMinutes": 45,
            "servings": 2,
            "extendedIngredients": [{"name": "garlic"}],
            "vegan": false
        }"#;

        let detail: RecipeDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.id, 716429);
        assert_eq!(detail.ready_in_minutes, Some(45));
        assert_eq!(detail.extended_ingredients.len(), 1);
        assert_eq!(detail.extra.get("vegan"), Some(&Value::Bool(false)));
    }
}
