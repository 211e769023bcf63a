pub mod sqlite;

use async_trait::async_trait;

use crate::core::{FavoriteEntry, FavoriteInput, HistoryEntry, HistoryInput, ToggleOutcome, User};
use crate::error::Result;

pub use sqlite::SqliteStore;

/// Per-user favorites and recently viewed recipes
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Add the favorite if absent, remove it if present
    async fn toggle_favorite(&self, user_id: i64, favorite: &FavoriteInput) -> Result<ToggleOutcome>;

    /// Favorites, newest first
    async fn favorites(&self, user_id: i64) -> Result<Vec<FavoriteEntry>>;

    /// Record a view; earlier views of the same recipe are replaced
    async fn record_view(&self, user_id: i64, entry: &HistoryInput) -> Result<()>;

    /// Most recent views, newest first
    async fn recently_viewed(&self, user_id: i64, limit: usize) -> Result<Vec<HistoryEntry>>;
}

/// Stored credentials for an account
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
}

/// Account and session persistence
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new user; duplicate email is a `Conflict`
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User>;

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>>;

    async fn create_session(&self, user_id: i64, token: &str) -> Result<()>;

    async fn find_session_user(&self, token: &str) -> Result<Option<User>>;

    /// Returns whether a session was removed
    async fn delete_session(&self, token: &str) -> Result<bool>;
}
