//! # RecipeSense
//!
//! Recipe discovery service with:
//! - Ingredient search and category browsing via the Spoonacular API
//! - Intelligence ranking (matched vs. missing ingredients, popularity)
//! - SQLite search cache keyed by normalized ingredient query
//! - Accounts, favorites and recently viewed history
//! - Interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use recipesense::{Config, RecipeEngine, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let engine = RecipeEngine::new(&config).await?;
//!
//!     let results = engine.search(SearchQuery::new("eggs, tomatoes, rice")).await?;
//!
//!     for recipe in &results.recipes {
//!         println!("{}", recipe.display_name());
//!     }
//!     Ok(())
//! }
//! ```

pub mod accounts;
pub mod cache;
pub mod config;
pub mod core;
pub mod db;
pub mod engine;
pub mod error;
pub mod providers;
pub mod ranking;
pub mod store;

// Re-export primary types
pub use accounts::Accounts;
pub use cache::SearchCache;
pub use config::Config;
pub use crate::core::{RecipeDetail, RecipeRecord, SearchResponse, SearchResultType};
pub use engine::{RecipeEngine, SearchOptions, SearchQuery};
pub use error::{RecipeSenseError, Result};
pub use ranking::{normalize_ingredient, IntelligenceRanker, Ranker, ScoringWeights};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
