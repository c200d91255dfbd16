use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::Json,
};
use url::form_urlencoded;

use crate::auth::perm;
use crate::db::models::{Task, TaskCreate, TaskPatch};
use crate::error::ApiError;
use crate::middleware::pagination::parse_i64;
use crate::middleware::{AuthUser, Pagination};
use crate::AppState;

/// Optional equality filter for the task list: ?cardId=3. Parsed strictly,
/// like the pagination window.
fn card_filter(query: &str) -> Result<Option<i64>, ApiError> {
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key == "cardId" {
            return parse_i64(&value, "cardId").map(Some);
        }
    }
    Ok(None)
}

/// GET /tasks?skip&limit&cardId - flat task list, no expansion
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Task>>, ApiError> {
    user.require(&[perm::READ])?;
    let query = query.as_deref().unwrap_or("");
    let card_id = card_filter(query)?;
    let page = Pagination::from_query(query)?;
    let tasks = state.store.list_tasks(card_id, page).await?;
    Ok(Json(tasks))
}

/// POST /tasks - the referenced card must exist (400 otherwise)
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<TaskCreate>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    user.require(&[perm::WRITE])?;
    let task = state.store.create_task(body).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /tasks/:id
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    user.require(&[perm::WRITE])?;
    let task = state.store.update_task(id, patch).await?;
    Ok(Json(task))
}

/// DELETE /tasks/:id
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    user.require(&[perm::WRITE])?;
    state.store.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
