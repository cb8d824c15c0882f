//! Registration, login and token issuing.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};

/// bcrypt hash of a password; the salt is part of the returned string.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored bcrypt hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| ApiError::Internal(format!("Failed to verify password: {}", e)))
}

/// Opaque bearer token.
pub fn new_token() -> String {
    Uuid::new_v4().to_string()
}

// Password hashing runs on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// Create an account and log it in.
pub async fn register(db: &Database, req: &RegisterRequest, config: &Config) -> Result<AuthResponse> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    if db.get_user_by_username(username).await?.is_some() {
        return Err(username_taken(username));
    }

    let password = req.password.clone();
    let cost = config.password_hash_cost;
    let hash = run_blocking(move || hash_password(&password, cost)).await?;

    let user = match db.create_user(username, &hash).await {
        Ok(user) => user,
        // Lost a race with a concurrent registration
        Err(ApiError::Database(sqlx::Error::Database(e))) if e.is_unique_violation() => {
            return Err(username_taken(username));
        }
        Err(e) => return Err(e),
    };

    tracing::info!(user_id = user.id, "Registered user {}", user.username);
    let token = issue_token(db, user.id, config.token_ttl_days).await?;

    Ok(AuthResponse {
        id: user.id,
        username: user.username,
        token,
    })
}

/// Check credentials and issue a fresh token.
pub async fn login(db: &Database, req: &LoginRequest, config: &Config) -> Result<AuthResponse> {
    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let user = db
        .get_user_by_username(req.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let password = req.password.clone();
    let password_hash = user.password_hash.clone();
    if !run_blocking(move || verify_password(&password, &password_hash)).await? {
        return Err(invalid());
    }

    let token = issue_token(db, user.id, config.token_ttl_days).await?;
    tracing::debug!(user_id = user.id, "User logged in");

    Ok(AuthResponse {
        id: user.id,
        username: user.username,
        token,
    })
}

pub async fn issue_token(db: &Database, user_id: i64, ttl_days: i64) -> Result<String> {
    let token = new_token();
    let expires_at = Utc::now() + Duration::days(ttl_days);
    db.insert_token(&token, user_id, expires_at).await?;
    Ok(token)
}

/// Resolve a bearer token to a user id. Unknown and expired tokens give `None`.
pub async fn authenticate(db: &Database, token: &str) -> Result<Option<i64>> {
    db.get_user_id_by_token(token).await
}

fn username_taken(username: &str) -> ApiError {
    ApiError::BadRequest(format!("Username '{}' is already taken", username))
}
