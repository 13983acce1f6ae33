// handlers/public/artworks.rs - artwork listings and single artwork reads
//
// Query parameters of the listings: page, limit, search, type, categoryIds
// (JSON list). Malformed values are ignored rather than rejected.

use axum::extract::{Path, Query, State};

use crate::app::AppState;
use crate::database::models::Artwork;
use crate::filter::{ListQuery, Paginated};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/artworks
pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> ApiResult<Paginated<Artwork>> {
    let page = state
        .artworks()
        .list(&query.filter_spec(), query.pagination(&state.config.api))
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/artworks/user/:userId
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Paginated<Artwork>> {
    let page = state
        .artworks()
        .list(&query.filter_spec().owned_by(user_id), query.pagination(&state.config.api))
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/artworks/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Artwork> {
    Ok(ApiResponse::success(state.artworks().find_404(id).await?))
}
