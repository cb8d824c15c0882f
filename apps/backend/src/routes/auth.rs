//! Authentication middleware and endpoints

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::services::auth;
use crate::AppState;

/// Authenticated user info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub token: String,
}

/// Caller on routes where logging in is optional
#[derive(Clone, Copy, Debug, Default)]
pub struct CurrentUser(pub Option<i64>);

fn bearer_token(headers: &HeaderMap) -> Result<String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?;

    Ok(token.to_string())
}

/// Auth middleware - requires a valid user token in the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers())?;

    let user_id = auth::authenticate(&state.db, &token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id, token });

    Ok(next.run(request).await)
}

/// Optional auth middleware - a missing or unusable token means anonymous
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let user_id = match bearer_token(request.headers()) {
        Ok(token) => auth::authenticate(&state.db, &token).await?,
        Err(_) => None,
    };

    request.extensions_mut().insert(CurrentUser(user_id));

    Ok(next.run(request).await)
}

/// POST /api/auth/registration
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    let response = auth::register(&state.db, &payload, &state.config).await?;
    Ok(Json(response))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let response = auth::login(&state.db, &payload, &state.config).await?;
    Ok(Json(response))
}
