// handlers/protected/categories.rs - the caller's categories
//
// GET /api/categories/my, POST /api/categories, PUT /api/categories/:id,
// DELETE /api/categories/:id. Someone else's category reads as 404.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::Category;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
}

impl CategoryRequest {
    fn name(&self) -> Result<&str, ApiError> {
        match self.name.trim() {
            "" => Err(ApiError::field("name", "Category name is required")),
            name => Ok(name),
        }
    }
}

pub async fn list_mine(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::success(state.categories().list_by_user(user.user_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<Category> {
    let Json(body) = payload?;
    let category = state.categories().create(user.user_id, body.name()?).await?;
    Ok(ApiResponse::created(category))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<Category> {
    let Json(body) = payload?;
    let category = state.categories().rename(id, user.user_id, body.name()?).await?;
    Ok(ApiResponse::success(category))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.categories().delete(id, user.user_id).await?;
    Ok(ApiResponse::no_content())
}
