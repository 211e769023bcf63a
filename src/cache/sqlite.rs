use rusqlite::{Connection, params, OptionalExtension};
use std::sync::MutexGuard;
use async_trait::async_trait;
use chrono::Utc;

use crate::cache::{cache_key, SearchCache, CachedSearch, CacheStats};
use crate::core::RecipeRecord;
use crate::db::{self, SharedConnection, format_timestamp, parse_timestamp};
use crate::error::{Result, RecipeSenseError};

/// SQLite-based search cache implementation
///
/// ```sql
/// CREATE TABLE search_cache (
///     query TEXT PRIMARY KEY,
///     recipes TEXT NOT NULL,
///     requested INTEGER NOT NULL DEFAULT 0,
///     hit_count INTEGER DEFAULT 0,
///     cached_at TEXT NOT NULL
/// );
/// ```
pub struct SqliteSearchCache {
    conn: SharedConnection,
}

impl SqliteSearchCache {
    /// Create new SQLite cache with its own connection
    pub async fn new(db_path: &str) -> Result<Self> {
        Self::from_connection(db::open(db_path)?)
    }

    /// Create cache on a shared connection
    pub fn from_connection(conn: SharedConnection) -> Result<Self> {
        {
            let guard = db::lock(&conn)?;
            guard.execute(
                "CREATE TABLE IF NOT EXISTS search_cache (
                    query TEXT PRIMARY KEY,
                    recipes TEXT NOT NULL,
                    requested INTEGER NOT NULL DEFAULT 0,
                    hit_count INTEGER DEFAULT 0,
                    cached_at TEXT NOT NULL
                )",
                [],
            )?;

            // Databases created before the column existed
            let has_requested: bool = guard.query_row(
                "SELECT COUNT(*) > 0 FROM pragma_table_info('search_cache') WHERE name = 'requested'",
                [],
                |row| row.get(0),
            )?;
            if !has_requested {
                guard.execute(
                    "ALTER TABLE search_cache ADD COLUMN requested INTEGER NOT NULL DEFAULT 0",
                    [],
                )?;
            }

            guard.execute(
                "CREATE INDEX IF NOT EXISTS idx_search_cached_at ON search_cache(cached_at)",
                [],
            )?;
        }

        Ok(Self { conn })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        db::lock(&self.conn)
    }
}

#[async_trait]
impl SearchCache for SqliteSearchCache {
    async fn get(&self, query: &str) -> Result<Option<CachedSearch>> {
        let key = cache_key(query);
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT recipes, requested, hit_count, cached_at FROM search_cache WHERE query = ?",
                params![key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i32>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((recipes_json, requested, hit_count, cached_at)) = row else {
            return Ok(None);
        };

        let recipes: Vec<RecipeRecord> = serde_json::from_str(&recipes_json)
            .map_err(|e| RecipeSenseError::Cache(format!("Corrupt entry for '{}': {}", key, e)))?;
        let cached_at = parse_timestamp(&cached_at).unwrap_or_else(Utc::now);

        Ok(Some(CachedSearch {
            query: key,
            recipes,
            requested: usize::try_from(requested).unwrap_or(0),
            hit_count,
            cached_at,
        }))
    }

    async fn save(&self, query: &str, recipes: &[RecipeRecord], requested: usize) -> Result<()> {
        let key = cache_key(query);
        let recipes_json = serde_json::to_string(recipes)?;
        let requested = i64::try_from(requested).unwrap_or(i64::MAX);
        let conn = self.conn()?;

        conn.execute(
            "INSERT OR REPLACE INTO search_cache (query, recipes, requested, hit_count, cached_at)
             VALUES (?1, ?2, ?3, COALESCE((SELECT hit_count FROM search_cache WHERE query = ?1), 0), ?4)",
            params![key, recipes_json, requested, format_timestamp(Utc::now())],
        )?;

        Ok(())
    }

    async fn increment_hit(&self, query: &str) -> Result<()> {
        let key = cache_key(query);
        let conn = self.conn()?;

        conn.execute(
            "UPDATE search_cache SET hit_count = hit_count + 1 WHERE query = ?",
            params![key],
        )?;

        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let conn = self.conn()?;

        let (total_entries, total_hits, oldest, newest): (i64, i64, Option<String>, Option<String>) =
            conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(hit_count), 0), MIN(cached_at), MAX(cached_at)
                 FROM search_cache",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        let avg_hit_count = if total_entries > 0 {
            total_hits as f64 / total_entries as f64
        } else {
            0.0
        };

        Ok(CacheStats {
            total_entries: total_entries as u64,
            total_hits: total_hits as u64,
            avg_hit_count,
            oldest_entry: oldest.as_deref().and_then(parse_timestamp),
            newest_entry: newest.as_deref().and_then(parse_timestamp),
        })
    }

    async fn cleanup(&self, max_age_days: i64) -> Result<u64> {
        if max_age_days < 0 {
            return Err(RecipeSenseError::InvalidInput(format!(
                "max_age_days must not be negative, got {}",
                max_age_days
            )));
        }

        let cutoff_date = chrono::Duration::try_days(max_age_days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .ok_or_else(|| {
                RecipeSenseError::InvalidInput(format!("max_age_days out of range: {}", max_age_days))
            })?;

        let conn = self.conn()?;

        let deleted = conn.execute(
            "DELETE FROM search_cache WHERE cached_at <= ?",
            params![format_timestamp(cutoff_date)],
        )?;

        Ok(deleted as u64)
    }
}
