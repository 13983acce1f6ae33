// handlers/protected/artworks.rs - the caller's artworks
//
// GET /api/artworks/my, POST /api/artworks, PUT /api/artworks/:id,
// DELETE /api/artworks/:id. Writes are multipart: `image` file plus
// `title`, `description`, `type` and `categoryIds` text fields.

use axum::extract::{Multipart, Path, Query, State};
use axum::Extension;

use crate::app::AppState;
use crate::database::models::Artwork;
use crate::error::ApiError;
use crate::filter::{ListQuery, Paginated};
use crate::handlers::forms::MultipartForm;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ArtworkService;

pub async fn list_mine(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Paginated<Artwork>> {
    let page = state
        .artworks()
        .list(&query.filter_spec().owned_by(user.user_id), query.pagination(&state.config.api))
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Artwork> {
    let mut form = MultipartForm::read(multipart, 1).await?;
    let image = form
        .take_file("image")
        .ok_or_else(|| ApiError::field("image", "Image file is required"))?;
    let write = form.artwork_write()?;

    let artwork = ArtworkService::from_state(&state).create(&user, image, write).await?;
    Ok(ApiResponse::created(artwork))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> ApiResult<Artwork> {
    let mut form = MultipartForm::read(multipart, 1).await?;
    let write = form.artwork_write()?;
    let image = form.take_file("image");

    let artwork = ArtworkService::from_state(&state).update(id, &user, image, write).await?;
    Ok(ApiResponse::success(artwork))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.artworks().delete(id, user.user_id).await?;
    Ok(ApiResponse::no_content())
}
