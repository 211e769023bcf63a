pub mod intelligence;
pub mod normalize;

use serde::{Deserialize, Serialize};

use crate::core::RecipeRecord;

pub use intelligence::IntelligenceRanker;
pub use normalize::{normalize_ingredient, tokenize_ingredients};

/// Trait for recipe ranking implementations
pub trait Ranker: Send + Sync {
    /// Annotate and reorder recipes against the user's ingredient query,
    /// highest score first. Never fails: missing fields count as zero.
    fn rank(&self, recipes: Vec<RecipeRecord>, user_ingredients: &str) -> Vec<RecipeRecord>;

    /// Get ranker name for logging
    fn name(&self) -> &str;
}

/// Weights of the intelligence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Points per used ingredient
    pub match_weight: i64,
    /// Points lost per missing ingredient
    pub missing_penalty: i64,
    /// Bonus for popular recipes
    pub popularity_bonus: i64,
    /// Likes must be strictly greater than this for the bonus
    pub popularity_threshold: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            match_weight: 10,
            missing_penalty: 5,
            popularity_bonus: 5,
            popularity_threshold: 50,
        }
    }
}
