// handlers/public/categories.rs - GET /api/categories, GET /api/categories/user/:userId

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::Category;
use crate::middleware::{ApiResponse, ApiResult};

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::success(state.categories().list_all().await?))
}

pub async fn list_by_user(State(state): State<AppState>, Path(user_id): Path<i32>) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::success(state.categories().list_by_user(user_id).await?))
}
