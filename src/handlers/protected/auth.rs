// handlers/protected/auth.rs - the caller's own account
//
// GET /api/auth/profile, PUT /api/auth/profile, PUT /api/auth/password,
// POST /api/auth/profile/image

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::UserProfile;
use crate::database::repository::ProfileUpdate;
use crate::error::ApiError;
use crate::handlers::forms::MultipartForm;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{AccountService, ProfileImage};

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub socials: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

pub async fn profile_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<UserProfile> {
    let profile = AccountService::from_state(&state).profile(user.user_id).await?;
    Ok(ApiResponse::success(profile))
}

pub async fn profile_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(body) = payload?;

    let profile = AccountService::from_state(&state)
        .update_profile(
            user.user_id,
            ProfileUpdate {
                email: body.email.filter(|e| !e.trim().is_empty()),
                name: body.name,
                summary: body.summary,
                socials: body.socials,
            },
        )
        .await?;

    Ok(ApiResponse::success(profile).with_message("Profile updated successfully"))
}

pub async fn password_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = payload?;

    AccountService::from_state(&state)
        .change_password(user.user_id, &body.current_password, &body.new_password)
        .await?;

    Ok(ApiResponse::success(json!({ "changed": true })).with_message("Password changed successfully"))
}

/// Multipart field `image`.
pub async fn profile_image_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<ProfileImage> {
    let mut form = MultipartForm::read(multipart, 1).await?;
    let image = form
        .take_file("image")
        .ok_or_else(|| ApiError::field("image", "No image file provided"))?;

    let result = AccountService::from_state(&state)
        .upload_profile_image(state.media.as_ref(), user.user_id, image)
        .await?;

    Ok(ApiResponse::success(result).with_message("Profile image uploaded successfully"))
}
