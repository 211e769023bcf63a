pub mod spoonacular;

use async_trait::async_trait;
use crate::core::{RecipeDetail, RecipeRecord};
use crate::error::Result;

pub use spoonacular::SpoonacularProvider;

/// Trait for recipe data providers
#[async_trait]
pub trait RecipeProvider: Send + Sync {
    /// Recipes using the given comma-separated ingredients, annotated
    /// with `usedIngredients` / `missedIngredients`
    async fn search_by_ingredients(&self, ingredients: &str, number: usize) -> Result<Vec<RecipeRecord>>;

    /// Recipes of a dish type (e.g. "dessert", "breakfast")
    async fn search_by_category(&self, category: &str, number: usize) -> Result<Vec<RecipeRecord>>;

    /// Full recipe information
    async fn get_by_id(&self, recipe_id: i64) -> Result<RecipeDetail>;

    /// Get provider name
    fn name(&self) -> &str;

    /// Check if provider is usable
    async fn is_available(&self) -> bool;
}
