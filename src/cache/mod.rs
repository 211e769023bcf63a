pub mod sqlite;

use async_trait::async_trait;
use crate::core::RecipeRecord;
use crate::error::Result;

pub use sqlite::SqliteSearchCache;

/// Trait for search result cache implementations
///
/// Entries are keyed by [`cache_key`]: a query whose key differs from a
/// cached one is a miss, there is no partial reuse.
#[async_trait]
pub trait SearchCache: Send + Sync {
    /// Get cached provider results by ingredient query
    async fn get(&self, query: &str) -> Result<Option<CachedSearch>>;

    /// Save provider results fetched with a limit of `requested`
    async fn save(&self, query: &str, recipes: &[RecipeRecord], requested: usize) -> Result<()>;

    /// Increment cache hit counter
    async fn increment_hit(&self, query: &str) -> Result<()>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats>;

    /// Clear expired entries (older than `max_age_days`)
    async fn cleanup(&self, max_age_days: i64) -> Result<u64>;
}

/// Cached search with metadata
#[derive(Debug, Clone)]
pub struct CachedSearch {
    pub query: String,
    /// Provider order, unranked
    pub recipes: Vec<RecipeRecord>,
    /// Result limit the provider was asked for
    pub requested: usize,
    pub hit_count: i32,
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

impl CachedSearch {
    /// Whether this entry can answer a request for `number` results.
    ///
    /// An entry holding fewer recipes than asked for still covers the
    /// request when the provider itself came back short for a limit at
    /// least that large.
    pub fn covers(&self, number: usize) -> bool {
        self.recipes.len() >= number || self.requested >= number
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: u64,
    pub total_hits: u64,
    pub avg_hit_count: f64,
    pub oldest_entry: Option<chrono::DateTime<chrono::Utc>>,
    pub newest_entry: Option<chrono::DateTime<chrono::Utc>>,
}

/// Normalize an ingredient query into a cache key.
///
/// `" Eggs ,RICE,, "` and `"eggs,rice"` share a key. Token order is kept.
pub fn cache_key(query: &str) -> String {
    query
        .to_lowercase()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
