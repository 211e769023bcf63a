use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::{Session, User};
use crate::error::{RecipeSenseError, Result};
use crate::store::AccountStore;

const MIN_PASSWORD_LEN: usize = 8;
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Email/password sign-up, login and session lookup
pub struct Accounts {
    store: Arc<dyn AccountStore>,
}

impl Accounts {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Create an account and open a session for it
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Session> {
        let email = normalize_email(email);
        let name = name.trim();

        if name.is_empty() {
            return Err(RecipeSenseError::InvalidInput("Name is required".to_string()));
        }
        if !email.contains('@') {
            return Err(RecipeSenseError::InvalidInput("A valid email is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RecipeSenseError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.store.find_credentials(&email).await?.is_some() {
            return Err(RecipeSenseError::Conflict("User already exists".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        let user = self.store.create_user(name, &email, &password_hash).await?;
        tracing::info!("New account {} ({})", user.id, user.email);

        self.open_session(user).await
    }

    /// Verify credentials and open a session
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = normalize_email(email);

        let Some(credentials) = self.store.find_credentials(&email).await? else {
            return Err(RecipeSenseError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let parsed_hash = PasswordHash::new(&credentials.password_hash)?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Err(RecipeSenseError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.open_session(credentials.user).await
    }

    /// Resolve a session token to its user
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        self.store
            .find_session_user(token)
            .await?
            .ok_or_else(|| RecipeSenseError::Unauthorized("Login required".to_string()))
    }

    /// End a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<()> {
        if !self.store.delete_session(token).await? {
            tracing::debug!("Logout for unknown session");
        }
        Ok(())
    }

    async fn open_session(&self, user: User) -> Result<Session> {
        let token = Uuid::new_v4().simple().to_string();
        self.store.create_session(user.id, &token).await?;
        Ok(Session { token, user })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
