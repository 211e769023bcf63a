use serde::{Deserialize, Serialize};
use crate::core::RecipeRecord;

/// Type of search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchResultType {
    /// Fetched from the provider and ranked
    Ranked,
    /// Cache hit (from database)
    CacheHit,
    /// Category listing, provider order
    Category,
}

/// Search response with recipes and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Ingredients or category as the user typed it
    pub query: String,

    /// Recipes in display order
    #[serde(default)]
    pub recipes: Vec<RecipeRecord>,

    /// Result type
    pub result_type: SearchResultType,

    /// Whether result came from cache
    pub from_cache: bool,

    /// Search latency in milliseconds
    pub latency_ms: f64,

    /// Provider that returned the result
    pub provider: String,

    /// Ranking method used (intelligence, none)
    pub ranking_method: String,
}

impl SearchResponse {
    /// Create a new search response
    pub fn new(
        query: impl Into<String>,
        recipes: Vec<RecipeRecord>,
        result_type: SearchResultType,
        from_cache: bool,
        latency_ms: f64,
    ) -> Self {
        Self {
            query: query.into(),
            recipes,
            result_type,
            from_cache,
            latency_ms,
            provider: String::from("unknown"),
            ranking_method: String::from("none"),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Set ranking method
    pub fn with_ranking_method(mut self, method: impl Into<String>) -> Self {
        self.ranking_method = method.into();
        self
    }

    /// Best recipe, if any
    pub fn top(&self) -> Option<&RecipeRecord> {
        self.recipes.first()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Get display string for logging
    pub fn display(&self) -> String {
        format!(
            "'{}' -> {} recipes ({}) [{}] {:?}",
            self.query,
            self.recipes.len(),
            self.provider,
            self.ranking_method,
            self.result_type
        )
    }
}
