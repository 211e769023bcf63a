use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use recipesense::core::{FavoriteInput, ToggleOutcome};
use recipesense::providers::RecipeProvider;
use recipesense::{
    Config, RecipeDetail, RecipeEngine, RecipeRecord, RecipeSenseError, SearchQuery,
    SearchResultType,
};

/// In-process stand-in for the recipe API
struct FakeProvider {
    recipes: Vec<RecipeRecord>,
    fail_with_rate_limit: bool,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn new(recipes: Vec<RecipeRecord>) -> Self {
        Self {
            recipes,
            fail_with_rate_limit: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn rate_limited() -> Self {
        Self {
            fail_with_rate_limit: true,
            ..Self::new(Vec::new())
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeProvider for FakeProvider {
    async fn search_by_ingredients(&self, _ingredients: &str, number: usize) -> recipesense::Result<Vec<RecipeRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_with_rate_limit {
            return Err(RecipeSenseError::RateLimited("fake".to_string()));
        }
        Ok(self.recipes.iter().take(number).cloned().collect())
    }

    async fn search_by_category(&self, _category: &str, number: usize) -> recipesense::Result<Vec<RecipeRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.recipes.iter().take(number).cloned().collect())
    }

    async fn get_by_id(&self, recipe_id: i64) -> recipesense::Result<RecipeDetail> {
        self.recipes
            .iter()
            .find(|r| r.id == Some(recipe_id))
            .map(|r| RecipeDetail::new(recipe_id, r.title.clone()))
            .ok_or_else(|| RecipeSenseError::NotFound(format!("recipe {}", recipe_id)))
    }

    fn name(&self) -> &str {
        "fake"
    }

    async fn is_available(&self) -> bool {
        true
    }
}

fn sample_recipes() -> Vec<RecipeRecord> {
    vec![
        RecipeRecord::new(1, "Plain Rice").with_counts(1, 0).with_likes(3), // 10
        RecipeRecord::new(2, "Shakshuka").with_counts(3, 1).with_likes(10), // 25
        RecipeRecord::new(3, "Tomato Omelette").with_counts(2, 0).with_likes(80), // 25
        RecipeRecord::new(4, "Paella").with_counts(1, 6), // -20
    ]
}

fn memory_config() -> Config {
    Config {
        db_path: ":memory:".to_string(),
        ..Config::default()
    }
}

async fn engine_with(provider: Arc<FakeProvider>) -> RecipeEngine {
    RecipeEngine::with_provider(&memory_config(), provider).await.unwrap()
}

#[tokio::test]
async fn test_search_ranks_results() {
    let provider = Arc::new(FakeProvider::new(sample_recipes()));
    let engine = engine_with(provider.clone()).await;

    let result = engine.search(SearchQuery::new("eggs, tomatoes, rice")).await.unwrap();

    let ids: Vec<_> = result.recipes.iter().map(|r| r.id.unwrap()).collect();
    assert_eq!(ids, vec![2, 3, 1, 4]);
    assert_eq!(result.result_type, SearchResultType::Ranked);
    assert_eq!(result.provider, "fake");
    assert_eq!(result.ranking_method, "intelligence");
    assert!(!result.from_cache);

    let top = &result.recipes[0];
    assert_eq!(top.matched_count, Some(3));
    assert_eq!(top.missing_count, Some(1));
    assert_eq!(top.intelligence_score, Some(25));
    assert_eq!(result.recipes[3].intelligence_score, Some(-20));
}

#[tokio::test]
async fn test_search_hits_cache_on_normalized_query() {
    let provider = Arc::new(FakeProvider::new(sample_recipes()));
    let engine = engine_with(provider.clone()).await;

    let first = engine.search(SearchQuery::new("Eggs, Rice")).await.unwrap();
    let second = engine.search(SearchQuery::new(" eggs ,rice ")).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert!(second.from_cache);
    assert_eq!(second.result_type, SearchResultType::CacheHit);
    assert_eq!(first.recipes, second.recipes);

    // A different query invalidates
    engine.search(SearchQuery::new("eggs")).await.unwrap();
    assert_eq!(provider.calls(), 2);

    let stats = engine.cache_stats().await.unwrap();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.total_hits, 1);
}

#[tokio::test]
async fn test_search_without_cache() {
    let provider = Arc::new(FakeProvider::new(sample_recipes()));
    let engine = engine_with(provider.clone()).await;

    let mut query = SearchQuery::new("eggs");
    query.use_cache = false;

    engine.search(query.clone()).await.unwrap();
    let again = engine.search(query).await.unwrap();

    assert_eq!(provider.calls(), 2);
    assert!(!again.from_cache);
    assert_eq!(engine.cache_stats().await.unwrap().total_entries, 0);
}

#[tokio::test]
async fn test_max_results() {
    let provider = Arc::new(FakeProvider::new(sample_recipes()));
    let engine = engine_with(provider).await;

    let mut query = SearchQuery::new("eggs");
    query.max_results = Some(2);

    let result = engine.search(query).await.unwrap();
    assert_eq!(result.recipes.len(), 2);
}

#[tokio::test]
async fn test_rate_limit_surfaces_as_error() {
    let provider = Arc::new(FakeProvider::rate_limited());
    let engine = engine_with(provider).await;

    let err = engine.search(SearchQuery::new("eggs")).await.unwrap_err();
    assert!(matches!(err, RecipeSenseError::RateLimited(_)));
    assert_eq!(engine.cache_stats().await.unwrap().total_entries, 0);
}

#[tokio::test]
async fn test_empty_results_are_not_cached() {
    let provider = Arc::new(FakeProvider::new(Vec::new()));
    let engine = engine_with(provider.clone()).await;

    let result = engine.search(SearchQuery::new("unobtainium")).await.unwrap();
    assert!(result.is_empty());

    engine.search(SearchQuery::new("unobtainium")).await.unwrap();
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_category_keeps_provider_order() {
    let provider = Arc::new(FakeProvider::new(sample_recipes()));
    let engine = engine_with(provider).await;

    let result = engine.search_category(" Dessert ", None).await.unwrap();

    let ids: Vec<_> = result.recipes.iter().map(|r| r.id.unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(result.query, "dessert");
    assert_eq!(result.result_type, SearchResultType::Category);
    assert!(result.recipes.iter().all(|r| r.intelligence_score.is_none()));
}

#[tokio::test]
async fn test_user_library_flow() {
    let provider = Arc::new(FakeProvider::new(sample_recipes()));
    let engine = engine_with(provider).await;

    let session = engine
        .accounts()
        .signup("Ada", "ada@example.com", "correct horse")
        .await
        .unwrap();
    let user_id = engine.accounts().authenticate(&session.token).await.unwrap().id;

    // Viewing records history, most recent first, no duplicates
    engine.recipe_detail(user_id, 2).await.unwrap();
    engine.recipe_detail(user_id, 3).await.unwrap();
    let detail = engine.recipe_detail(user_id, 2).await.unwrap();
    assert_eq!(detail.title, "Shakshuka");

    let history: Vec<_> = engine
        .recently_viewed(user_id)
        .await
        .unwrap()
        .iter()
        .map(|h| h.recipe_id)
        .collect();
    assert_eq!(history, vec![2, 3]);

    // Unknown recipe is an error and leaves history alone
    let err = engine.recipe_detail(user_id, 999).await.unwrap_err();
    assert!(matches!(err, RecipeSenseError::NotFound(_)));
    assert_eq!(engine.recently_viewed(user_id).await.unwrap().len(), 2);

    // Favorites toggle
    let favorite = FavoriteInput {
        recipe_id: 3,
        title: "Tomato Omelette".to_string(),
        image: String::new(),
        ready_in_minutes: Some(15),
    };
    assert_eq!(engine.toggle_favorite(user_id, &favorite).await.unwrap(), ToggleOutcome::Added);
    assert_eq!(engine.favorites(user_id).await.unwrap().len(), 1);
    assert_eq!(engine.toggle_favorite(user_id, &favorite).await.unwrap(), ToggleOutcome::Removed);
    assert!(engine.favorites(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cache_cleanup() {
    let provider = Arc::new(FakeProvider::new(sample_recipes()));
    let engine = engine_with(provider).await;

    engine.search(SearchQuery::new("eggs")).await.unwrap();
    assert_eq!(engine.cleanup_expired().await.unwrap(), 0);

    // Cleanup old entries (0 days = everything)
    let deleted = engine.cleanup_cache(0).await.unwrap();
    assert_eq!(deleted, 1);
}

#[tokio::test]
async fn test_larger_request_refetches_small_cache_entry() {
    let provider = Arc::new(FakeProvider::new(sample_recipes()));
    let engine = engine_with(provider.clone()).await;

    let mut small = SearchQuery::new("eggs");
    small.max_results = Some(2);
    let first = engine.search(small.clone()).await.unwrap();
    assert_eq!(first.recipes.len(), 2);

    // Default size asks for more than the entry was fetched with
    let full = engine.search(SearchQuery::new("eggs")).await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert!(!full.from_cache);
    assert_eq!(full.recipes.len(), 4);

    // The provider only had 4 for a limit of 12, so the entry now covers both sizes
    let again = engine.search(SearchQuery::new("eggs")).await.unwrap();
    assert!(again.from_cache);
    assert_eq!(again.recipes, full.recipes);

    let cut = engine.search(small).await.unwrap();
    assert!(cut.from_cache);
    let ids: Vec<_> = cut.recipes.iter().map(|r| r.id.unwrap()).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_cached_results_use_current_weights() {
    let path = std::env::temp_dir().join(format!("recipesense-weights-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let db_path = path.to_string_lossy().to_string();

    let provider = Arc::new(FakeProvider::new(sample_recipes()));
    let config = Config {
        db_path: db_path.clone(),
        ..Config::default()
    };
    let engine = RecipeEngine::with_provider(&config, provider.clone()).await.unwrap();
    let first = engine.search(SearchQuery::new("eggs")).await.unwrap();
    assert_eq!(first.recipes[0].intelligence_score, Some(25));
    drop(engine);

    // Same database, popularity now dominates
    let mut reweighted = Config {
        db_path,
        ..Config::default()
    };
    reweighted.weights.popularity_bonus = 1000;
    let engine = RecipeEngine::with_provider(&reweighted, provider.clone()).await.unwrap();
    let second = engine.search(SearchQuery::new("eggs")).await.unwrap();

    assert!(second.from_cache);
    assert_eq!(provider.calls(), 1);
    assert_eq!(second.ranking_method, "intelligence");
    let ids: Vec<_> = second.recipes.iter().map(|r| r.id.unwrap()).collect();
    assert_eq!(ids, vec![3, 2, 1, 4]);
    assert_eq!(second.recipes[0].intelligence_score, Some(1020));

    drop(engine);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_cleanup_rejects_bad_ages() {
    let provider = Arc::new(FakeProvider::new(sample_recipes()));
    let engine = engine_with(provider).await;

    engine.search(SearchQuery::new("eggs")).await.unwrap();

    for age in [-7, 200_000_000_000_000] {
        let err = engine.cleanup_cache(age).await.unwrap_err();
        assert!(matches!(err, RecipeSenseError::InvalidInput(_)), "{age}");
    }
    assert_eq!(engine.cache_stats().await.unwrap().total_entries, 1);
}
