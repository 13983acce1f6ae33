// handlers/protected/projects.rs - the caller's projects
//
// GET /api/projects/my, POST /api/projects, PUT /api/projects/:id,
// DELETE /api/projects/:id.
//
// POST takes `images` files (at least one) plus `title`, `description` and
// `categoryIds`. PUT additionally takes `removedImageIndices` (JSON list),
// `modifiedImageIndices` paired in order with `modifiedImages` files, and
// `addedImages` files; indices refer to the list before the edit.

use axum::extract::{Multipart, Path, Query, State};
use axum::Extension;

use crate::app::AppState;
use crate::database::models::Project;
use crate::filter::{ListQuery, Paginated};
use crate::handlers::forms::MultipartForm;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ProjectService;

pub async fn list_mine(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Paginated<Project>> {
    let page = state
        .projects()
        .list(&query.filter_spec().owned_by(user.user_id), query.pagination(&state.config.api))
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Project> {
    let max_images = state.config.api.max_images_per_field;
    let mut form = MultipartForm::read(multipart, max_images).await?;
    let mut write = form.project_write();
    let title = write.title.take();
    let images = form.take_files("images");

    let project = ProjectService::from_state(&state)
        .create(&user, title, images, write)
        .await?;
    Ok(ApiResponse::created(project))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> ApiResult<Project> {
    let max_images = state.config.api.max_images_per_field;
    let mut form = MultipartForm::read(multipart, max_images).await?;
    let write = form.project_write();
    let edit = form.take_image_edit();

    let project = ProjectService::from_state(&state).update(id, &user, write, edit).await?;
    Ok(ApiResponse::success(project))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.projects().delete(id, user.user_id).await?;
    Ok(ApiResponse::no_content())
}
