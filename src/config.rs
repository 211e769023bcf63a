use std::{collections::HashMap, env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::error::{RecipeSenseError, Result};
use crate::providers::spoonacular::DEFAULT_BASE_URL;
use crate::ranking::ScoringWeights;

/// Runtime configuration, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub spoonacular_api_key: String,
    pub spoonacular_base_url: String,
    /// Recipes requested per search
    pub results_per_search: usize,
    /// Entries returned by the recently viewed list
    pub history_limit: usize,
    /// Cached searches older than this are removed on cleanup
    pub cache_max_age_days: i64,
    pub weights: ScoringWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "recipesense.db".to_string(),
            port: 8090,
            spoonacular_api_key: String::new(),
            spoonacular_base_url: DEFAULT_BASE_URL.to_string(),
            results_per_search: 12,
            history_limit: 10,
            cache_max_age_days: 7,
            weights: ScoringWeights::default(),
        }
    }
}

impl Config {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars().collect())
    }

    /// Load from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();
        let loader = Loader { vars };

        let spoonacular_api_key = loader.string("SPOONACULAR_API_KEY", "");
        if spoonacular_api_key.is_empty() {
            warn!("SPOONACULAR_API_KEY not set, recipe searches will fail");
        }

        let cache_max_age_days = loader.parse("CACHE_MAX_AGE_DAYS", defaults.cache_max_age_days)?;
        if cache_max_age_days < 0 {
            warn!("Invalid CACHE_MAX_AGE_DAYS value: {cache_max_age_days}");
            return Err(RecipeSenseError::InvalidInput(format!(
                "CACHE_MAX_AGE_DAYS={cache_max_age_days}: must not be negative"
            )));
        }

        Ok(Self {
            db_path: loader.string("DB_PATH", &defaults.db_path),
            port: loader.parse("PORT", defaults.port)?,
            spoonacular_api_key,
            spoonacular_base_url: loader.string("SPOONACULAR_BASE_URL", &defaults.spoonacular_base_url),
            results_per_search: loader.parse("RESULTS_PER_SEARCH", defaults.results_per_search)?,
            history_limit: loader.parse("HISTORY_LIMIT", defaults.history_limit)?,
            cache_max_age_days,
            weights: ScoringWeights {
                match_weight: loader.parse("MATCH_WEIGHT", defaults.weights.match_weight)?,
                missing_penalty: loader.parse("MISSING_PENALTY", defaults.weights.missing_penalty)?,
                popularity_bonus: loader.parse("POPULARITY_BONUS", defaults.weights.popularity_bonus)?,
                popularity_threshold: loader
                    .parse("POPULARITY_THRESHOLD", defaults.weights.popularity_threshold)?,
            },
        })
    }
}

struct Loader {
    vars: HashMap<String, String>,
}

impl Loader {
    fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        match self.var(key) {
            Some(value) => value.to_string(),
            None => {
                info!("{key} not set, using default: {default}");
                default.to_string()
            }
        }
    }

    fn parse<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        let Some(raw) = self.var(key) else {
            info!("{key} not set, using default: {default}");
            return Ok(default);
        };

        raw.parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            RecipeSenseError::InvalidInput(format!("{key}={raw}: {e}"))
        })
    }
}
