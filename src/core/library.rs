use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Data needed to save a favorite (taken from the search result the user clicked)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteInput {
    pub recipe_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ready_in_minutes: Option<i64>,
}

/// A saved favorite
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteEntry {
    pub user_id: i64,
    pub recipe_id: i64,
    pub title: String,
    pub image: String,
    pub ready_in_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Result of toggling a favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Data recorded when a user opens a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryInput {
    pub recipe_id: i64,
    pub title: String,
    pub image: String,
}

impl From<&crate::core::RecipeDetail> for HistoryInput {
    fn from(detail: &crate::core::RecipeDetail) -> Self {
        Self {
            recipe_id: detail.id,
            title: detail.title.clone(),
            image: detail.image.clone(),
        }
    }
}

/// A recently viewed recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub user_id: i64,
    pub recipe_id: i64,
    pub title: String,
    pub image: String,
    pub viewed_at: DateTime<Utc>,
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// An authenticated session handed back to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}
