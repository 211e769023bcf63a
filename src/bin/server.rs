use axum::{
    async_trait,
    extract::{FromRequestParts, Json, Path, Query, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipesense::core::{FavoriteEntry, FavoriteInput, HistoryEntry, Session, ToggleOutcome, User};
use recipesense::{Config, RecipeDetail, RecipeEngine, RecipeSenseError, SearchQuery, SearchResponse};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
struct AppState {
    engine: Arc<RecipeEngine>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    ingredients: String,
    #[serde(default)]
    max_results: Option<usize>,
    #[serde(default = "default_true")]
    use_cache: bool,
}

#[derive(Debug, Deserialize)]
struct CategoryParams {
    #[serde(default)]
    max_results: Option<usize>,
}

fn default_true() -> bool { true }

#[derive(Deserialize)]
struct SignupRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct ToggleResponse {
    status: ToggleOutcome,
}

#[derive(Debug, Serialize)]
struct LogoutResponse {
    status: String,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    cache: CacheStatsDto,
}

#[derive(Debug, Serialize)]
struct CacheStatsDto {
    total_entries: u64,
    total_hits: u64,
    avg_hit_count: f64,
}

/// Caller resolved from the `Authorization: Bearer <token>` header
struct AuthUser {
    user: User,
    token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| RecipeSenseError::Unauthorized("Login required".to_string()))?;

        let user = state.engine.accounts().authenticate(token).await?;

        Ok(Self {
            user,
            token: token.to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipesense_server=debug,recipesense=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("🚀 Starting RecipeSense Server");
    tracing::info!("📦 Database: {}", config.db_path);
    tracing::info!("🔌 Port: {}", config.port);

    let engine = Arc::new(RecipeEngine::new(&config).await?);

    // Periodic cache expiry
    let cleanup_engine = engine.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            match cleanup_engine.cleanup_expired().await {
                Ok(0) => {}
                Ok(n) => tracing::info!("🧹 Removed {} expired cache entries", n),
                Err(e) => tracing::warn!("Cache cleanup failed: {}", e),
            }
        }
    });

    let state = AppState { engine };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/auth/signup", post(signup_handler))
        .route("/v1/auth/login", post(login_handler))
        .route("/v1/auth/logout", post(logout_handler))
        .route("/v1/recipes", get(search_handler))
        .route("/v1/recipes/:id", get(recipe_handler))
        .route("/v1/categories/:category", get(category_handler))
        .route("/v1/favorites", get(favorites_handler))
        .route("/v1/favorites/toggle", post(toggle_favorite_handler))
        .route("/v1/history", get(history_handler))
        .route("/v1/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🍳 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: recipesense::VERSION.to_string(),
    })
}

async fn signup_handler(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    let session = state
        .engine
        .accounts()
        .signup(&req.name, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Session>, AppError> {
    let session = state.engine.accounts().login(&req.email, &req.password).await?;
    tracing::info!("User {} logged in", session.user.id);
    Ok(Json(session))
}

async fn logout_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<LogoutResponse>, AppError> {
    state.engine.accounts().logout(&auth.token).await?;
    Ok(Json(LogoutResponse {
        status: "logged_out".to_string(),
    }))
}

async fn search_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    tracing::debug!("Search request from {}: {:?}", auth.user.id, params);

    let query = SearchQuery {
        ingredients: params.ingredients,
        max_results: params.max_results,
        use_cache: params.use_cache,
    };

    let result = state.engine.search(query).await?;

    tracing::info!("✅ {} ({:.1}ms)", result.display(), result.latency_ms);

    Ok(Json(result))
}

async fn category_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(category): Path<String>,
    Query(params): Query<CategoryParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let result = state.engine.search_category(&category, params.max_results).await?;
    Ok(Json(result))
}

async fn recipe_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<Json<RecipeDetail>, AppError> {
    let detail = state.engine.recipe_detail(auth.user.id, recipe_id).await?;
    Ok(Json(detail))
}

async fn toggle_favorite_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(favorite): Json<FavoriteInput>,
) -> Result<Json<ToggleResponse>, AppError> {
    let status = state.engine.toggle_favorite(auth.user.id, &favorite).await?;
    Ok(Json(ToggleResponse { status }))
}

async fn favorites_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<FavoriteEntry>>, AppError> {
    Ok(Json(state.engine.favorites(auth.user.id).await?))
}

async fn history_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    Ok(Json(state.engine.recently_viewed(auth.user.id).await?))
}

async fn stats_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<StatsResponse>, AppError> {
    let cache_stats = state.engine.cache_stats().await?;

    Ok(Json(StatsResponse {
        cache: CacheStatsDto {
            total_entries: cache_stats.total_entries,
            total_hits: cache_stats.total_hits,
            avg_hit_count: cache_stats.avg_hit_count,
        },
    }))
}

// Error handling
struct AppError(RecipeSenseError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RecipeSenseError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RecipeSenseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RecipeSenseError::NotFound(_) => StatusCode::NOT_FOUND,
            RecipeSenseError::Conflict(_) => StatusCode::CONFLICT,
            RecipeSenseError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            RecipeSenseError::Provider { .. } | RecipeSenseError::HttpRequest(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!("❌ Error: {} - {}", status, message);
        } else {
            tracing::debug!("Request rejected: {} - {}", status, message);
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<RecipeSenseError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
