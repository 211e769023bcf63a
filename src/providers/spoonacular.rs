use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::core::{RecipeDetail, RecipeRecord};
use crate::providers::RecipeProvider;
use crate::error::{Result, RecipeSenseError};

const PROVIDER: &str = "spoonacular";

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";

/// Spoonacular recipe API provider
pub struct SpoonacularProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ComplexSearchResponse {
    #[serde(default)]
    results: Vec<RecipeRecord>,
}

fn provider_error(message: impl Into<String>) -> RecipeSenseError {
    RecipeSenseError::Provider {
        provider: PROVIDER.to_string(),
        message: message.into(),
    }
}

impl SpoonacularProvider {
    /// Create new Spoonacular provider
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn find_by_ingredients_url(&self, ingredients: &str, number: usize) -> String {
        format!(
            "{}/recipes/findByIngredients?apiKey={}&ingredients={}&number={}&ranking=1&ignorePantry=true",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(ingredients),
            number
        )
    }

    fn complex_search_url(&self, category: &str, number: usize) -> String {
        format!(
            "{}/recipes/complexSearch?apiKey={}&type={}&number={}&addRecipeInformation=true",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(category),
            number
        )
    }

    fn information_url(&self, recipe_id: i64) -> String {
        format!(
            "{}/recipes/{}/information?apiKey={}&includeNutrition=true",
            self.base_url,
            recipe_id,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Send a GET request and map non-success statuses to errors
    async fn get(&self, url: &str, what: &str) -> Result<Response> {
        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| provider_error(format!("{} request failed: {}", what, e.without_url())))?;

        let status = response.status();
        tracing::debug!("Spoonacular {} -> HTTP {}", what, status);

        match status {
            // 402: daily quota exhausted
            StatusCode::PAYMENT_REQUIRED | StatusCode::TOO_MANY_REQUESTS => {
                Err(RecipeSenseError::RateLimited(PROVIDER.to_string()))
            }
            StatusCode::NOT_FOUND => Err(RecipeSenseError::NotFound(what.to_string())),
            s if !s.is_success() => Err(provider_error(format!("HTTP {}", s))),
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl RecipeProvider for SpoonacularProvider {
    async fn search_by_ingredients(&self, ingredients: &str, number: usize) -> Result<Vec<RecipeRecord>> {
        let url = self.find_by_ingredients_url(ingredients, number);

        // Array at top level
        let recipes: Vec<RecipeRecord> = self
            .get(&url, "search")
            .await?
            .json()
            .await
            .map_err(|e| provider_error(format!("Invalid JSON: {}", e.without_url())))?;

        Ok(recipes)
    }

    async fn search_by_category(&self, category: &str, number: usize) -> Result<Vec<RecipeRecord>> {
        let url = self.complex_search_url(category, number);

        let response: ComplexSearchResponse = self
            .get(&url, "category search")
            .await?
            .json()
            .await
            .map_err(|e| provider_error(format!("Invalid JSON: {}", e.without_url())))?;

        Ok(response.results)
    }

    async fn get_by_id(&self, recipe_id: i64) -> Result<RecipeDetail> {
        let url = self.information_url(recipe_id);
        let what = format!("recipe {}", recipe_id);

        let detail: RecipeDetail = self
            .get(&url, &what)
            .await?
            .json()
            .await
            .map_err(|e| provider_error(format!("Invalid JSON: {}", e.without_url())))?;

        Ok(detail)
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    async fn is_available(&self) -> bool {
        // Every endpoint rejects requests without a key
        !self.api_key.is_empty()
    }
}
