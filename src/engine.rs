use crate::accounts::Accounts;
use crate::cache::{cache_key, CacheStats, SearchCache, SqliteSearchCache};
use crate::config::Config;
use crate::core::{
    FavoriteEntry, FavoriteInput, HistoryEntry, HistoryInput, RecipeDetail, SearchResponse,
    SearchResultType, ToggleOutcome,
};
use crate::db;
use crate::error::{RecipeSenseError, Result};
use crate::providers::{RecipeProvider, SpoonacularProvider};
use crate::ranking::{IntelligenceRanker, Ranker};
use crate::store::{LibraryStore, SqliteStore};
use std::sync::Arc;
use std::time::Instant;

/// Main recipe search orchestrator
pub struct RecipeEngine {
    cache: Arc<dyn SearchCache>,
    ranker: Arc<dyn Ranker>,
    provider: Arc<dyn RecipeProvider>,
    library: Arc<dyn LibraryStore>,
    accounts: Accounts,
    options: SearchOptions,
}

/// Ingredient search parameters
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Comma-separated ingredients as typed by the user
    pub ingredients: String,
    /// Defaults to `SearchOptions::results_per_search`
    pub max_results: Option<usize>,
    pub use_cache: bool,
}

impl SearchQuery {
    pub fn new(ingredients: impl Into<String>) -> Self {
        Self {
            ingredients: ingredients.into(),
            max_results: None,
            use_cache: true,
        }
    }
}

/// Search options/configuration
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub results_per_search: usize,
    pub history_limit: usize,
    pub cache_max_age_days: i64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            results_per_search: 12,
            history_limit: 10,
            cache_max_age_days: 7,
        }
    }
}

impl From<&Config> for SearchOptions {
    fn from(config: &Config) -> Self {
        Self {
            results_per_search: config.results_per_search,
            history_limit: config.history_limit,
            cache_max_age_days: config.cache_max_age_days,
        }
    }
}

impl RecipeEngine {
    /// Create engine backed by SQLite and the Spoonacular API
    pub async fn new(config: &Config) -> Result<Self> {
        let provider = Arc::new(SpoonacularProvider::new(
            config.spoonacular_api_key.clone(),
            config.spoonacular_base_url.clone(),
        )?);

        Self::with_provider(config, provider).await
    }

    /// Create engine backed by SQLite with a custom recipe provider
    pub async fn with_provider(config: &Config, provider: Arc<dyn RecipeProvider>) -> Result<Self> {
        let conn = db::open(&config.db_path)?;
        let cache = Arc::new(SqliteSearchCache::from_connection(conn.clone())?);
        let store = Arc::new(SqliteStore::from_connection(conn)?);

        if !provider.is_available().await {
            tracing::warn!("⚠️ Provider {} is not available", provider.name());
        }

        Ok(Self {
            cache,
            ranker: Arc::new(IntelligenceRanker::with_weights(config.weights)),
            provider,
            library: store.clone(),
            accounts: Accounts::new(store),
            options: SearchOptions::from(config),
        })
    }

    /// Account operations (signup, login, sessions)
    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Search recipes by ingredients, ranked by intelligence score
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResponse> {
        let start = Instant::now();

        let key = cache_key(&query.ingredients);
        if key.is_empty() {
            return Err(RecipeSenseError::InvalidInput(
                "Please enter at least one ingredient".to_string(),
            ));
        }
        let number = query.max_results.unwrap_or(self.options.results_per_search);
        let ingredients = query.ingredients.trim();

        // Check cache first. Entries hold provider order and are ranked on
        // the way out, so scores always reflect the current weights.
        if query.use_cache {
            match self.cache.get(&key).await {
                Ok(Some(cached)) if cached.covers(number) => {
                    if let Err(e) = self.cache.increment_hit(&key).await {
                        tracing::warn!("Failed to count cache hit: {}", e);
                    }

                    let mut recipes = cached.recipes;
                    recipes.truncate(number);
                    let ranked = self.ranker.rank(recipes, ingredients);
                    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

                    return Ok(SearchResponse::new(
                        query.ingredients,
                        ranked,
                        SearchResultType::CacheHit,
                        true,
                        latency_ms,
                    )
                    .with_provider("cache")
                    .with_ranking_method(self.ranker.name()));
                }
                Ok(Some(cached)) => tracing::debug!(
                    "Cached '{}' has {} of {} recipes, querying provider",
                    key,
                    cached.recipes.len(),
                    number
                ),
                Ok(None) => {}
                Err(e) => tracing::warn!("Cache lookup failed, querying provider: {}", e),
            }
        }

        let recipes = self.provider.search_by_ingredients(ingredients, number).await?;
        tracing::debug!("Provider {} returned {} recipes", self.provider.name(), recipes.len());

        // Save to cache
        if query.use_cache && !recipes.is_empty() {
            if let Err(e) = self.cache.save(&key, &recipes, number).await {
                tracing::warn!("Failed to save to cache: {}", e);
            }
        }

        let ranked = self.ranker.rank(recipes, ingredients);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(SearchResponse::new(
            query.ingredients,
            ranked,
            SearchResultType::Ranked,
            false,
            latency_ms,
        )
        .with_provider(self.provider.name())
        .with_ranking_method(self.ranker.name()))
    }

    /// Browse recipes of a dish type, in provider order
    pub async fn search_category(&self, category: &str, max_results: Option<usize>) -> Result<SearchResponse> {
        let start = Instant::now();

        let category = category.trim().to_lowercase();
        if category.is_empty() {
            return Err(RecipeSenseError::InvalidInput("Category is required".to_string()));
        }
        let number = max_results.unwrap_or(self.options.results_per_search);

        let recipes = self.provider.search_by_category(&category, number).await?;
        tracing::debug!("Category '{}' returned {} recipes", category, recipes.len());

        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(SearchResponse::new(category, recipes, SearchResultType::Category, false, latency_ms)
            .with_provider(self.provider.name()))
    }

    /// Fetch recipe details without touching any history
    pub async fn fetch_recipe(&self, recipe_id: i64) -> Result<RecipeDetail> {
        self.provider.get_by_id(recipe_id).await
    }

    /// Fetch recipe details and add the recipe to the user's history
    pub async fn recipe_detail(&self, user_id: i64, recipe_id: i64) -> Result<RecipeDetail> {
        let detail = self.fetch_recipe(recipe_id).await?;

        if let Err(e) = self.library.record_view(user_id, &HistoryInput::from(&detail)).await {
            tracing::warn!("Failed to record view of {} for user {}: {}", recipe_id, user_id, e);
        }

        Ok(detail)
    }

    pub async fn toggle_favorite(&self, user_id: i64, favorite: &FavoriteInput) -> Result<ToggleOutcome> {
        let outcome = self.library.toggle_favorite(user_id, favorite).await?;
        tracing::debug!("User {} favorite {} -> {:?}", user_id, favorite.recipe_id, outcome);
        Ok(outcome)
    }

    pub async fn favorites(&self, user_id: i64) -> Result<Vec<FavoriteEntry>> {
        self.library.favorites(user_id).await
    }

    /// Most recently viewed recipes, capped at `history_limit`
    pub async fn recently_viewed(&self, user_id: i64) -> Result<Vec<HistoryEntry>> {
        self.library.recently_viewed(user_id, self.options.history_limit).await
    }

    /// Get cache statistics
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        self.cache.stats().await
    }

    /// Clean up old cache entries
    pub async fn cleanup_cache(&self, max_age_days: i64) -> Result<u64> {
        self.cache.cleanup(max_age_days).await
    }

    /// Clean up cache entries past the configured age
    pub async fn cleanup_expired(&self) -> Result<u64> {
        self.cleanup_cache(self.options.cache_max_age_days).await
    }
}
