// handlers/public/auth.rs - POST /api/auth/register, POST /api/auth/login,
// GET /api/auth/profile/:userId

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::PublicProfile;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AccountService, AuthSession, RegisterInput};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub socials: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email address.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/register - create an account and return a token
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<AuthSession> {
    let Json(body) = payload?;

    let session = AccountService::from_state(&state)
        .register(RegisterInput {
            username: body.username,
            email: body.email,
            password: body.password,
            name: body.name,
            summary: body.summary,
            socials: body.socials,
        })
        .await?;

    Ok(ApiResponse::created(session).with_message("User registered successfully"))
}

/// POST /api/auth/login - exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<AuthSession> {
    let Json(body) = payload?;

    let session = AccountService::from_state(&state)
        .login(&body.username, &body.password)
        .await?;

    Ok(ApiResponse::success(session).with_message("Login successful"))
}

/// GET /api/auth/profile/:userId - anyone's public profile (no email)
pub async fn public_profile(State(state): State<AppState>, Path(user_id): Path<i32>) -> ApiResult<PublicProfile> {
    let profile = state
        .users()
        .public_profile(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(profile))
}
