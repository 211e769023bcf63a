use thiserror::Error;

/// Main error type for the recipe service
#[derive(Error, Debug)]
pub enum RecipeSenseError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider errors
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// Provider quota exhausted or throttled
    #[error("Provider '{0}' rate limit reached, try again later")]
    RateLimited(String),

    /// Cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Malformed or absent user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or rejected credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unknown recipe or record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violations (e.g. duplicate account)
    #[error("{0}")]
    Conflict(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for RecipeSenseError {
    fn from(s: String) -> Self {
        RecipeSenseError::Other(s)
    }
}

impl From<&str> for RecipeSenseError {
    fn from(s: &str) -> Self {
        RecipeSenseError::Other(s.to_string())
    }
}

impl From<argon2::password_hash::Error> for RecipeSenseError {
    fn from(e: argon2::password_hash::Error) -> Self {
        RecipeSenseError::Other(format!("Password hashing failed: {}", e))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RecipeSenseError>;
