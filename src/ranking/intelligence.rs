use std::cmp::Reverse;

use crate::core::RecipeRecord;
use crate::ranking::{tokenize_ingredients, Ranker, ScoringWeights};

/// Ranks recipes by how many of the user's ingredients they use,
/// penalizing missing ingredients and rewarding popular recipes.
#[derive(Debug, Clone, Default)]
pub struct IntelligenceRanker {
    weights: ScoringWeights,
}

impl IntelligenceRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Compute the score for a recipe without touching it
    pub fn score(&self, recipe: &RecipeRecord) -> i64 {
        let matched = i64::try_from(recipe.used_ingredients.len()).unwrap_or(i64::MAX);
        let missing = i64::try_from(recipe.missed_ingredients.len()).unwrap_or(i64::MAX);

        // Weights come from configuration; clamp instead of overflowing
        let mut score = matched
            .saturating_mul(self.weights.match_weight)
            .saturating_sub(missing.saturating_mul(self.weights.missing_penalty));
        if recipe.likes_or_zero() > self.weights.popularity_threshold {
            score = score.saturating_add(self.weights.popularity_bonus);
        }
        score
    }

    /// Write `matched_count`, `missing_count` and `intelligence_score` onto the record
    pub fn annotate(&self, recipe: &mut RecipeRecord) {
        recipe.matched_count = Some(recipe.used_ingredients.len());
        recipe.missing_count = Some(recipe.missed_ingredients.len());
        recipe.intelligence_score = Some(self.score(recipe));
    }
}

impl Ranker for IntelligenceRanker {
    fn rank(&self, mut recipes: Vec<RecipeRecord>, user_ingredients: &str) -> Vec<RecipeRecord> {
        // Tokens do not feed the score; the provider already matched ingredients.
        let tokens = tokenize_ingredients(user_ingredients);
        tracing::trace!("Normalized user ingredients: {:?}", tokens);

        for recipe in recipes.iter_mut() {
            self.annotate(recipe);
        }

        // Stable: equal scores keep the provider's relevance order
        recipes.sort_by_key(|r| Reverse(r.intelligence_score.unwrap_or(0)));

        recipes
    }

    fn name(&self) -> &str {
        "intelligence"
    }
}
