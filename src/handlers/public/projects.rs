// handlers/public/projects.rs - project listings and single project reads
//
// Same query parameters as the artwork listings except `type`, which
// projects do not have.

use axum::extract::{Path, Query, State};

use crate::app::AppState;
use crate::database::models::Project;
use crate::filter::{ListQuery, Paginated};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/projects
pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> ApiResult<Paginated<Project>> {
    let page = state
        .projects()
        .list(&query.filter_spec(), query.pagination(&state.config.api))
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/projects/user/:userId
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Paginated<Project>> {
    let page = state
        .projects()
        .list(&query.filter_spec().owned_by(user_id), query.pagination(&state.config.api))
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/projects/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Project> {
    Ok(ApiResponse::success(state.projects().find_404(id).await?))
}
