use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::Json,
};

use crate::auth::perm;
use crate::db::models::{Board, BoardCreate, BoardPatch, BoardView};
use crate::error::ApiError;
use crate::middleware::{AuthUser, Pagination};
use crate::AppState;

/// GET /boards?skip&limit - boards expanded two levels deep (cards with tasks)
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<BoardView>>, ApiError> {
    user.require(&[perm::READ])?;
    let page = Pagination::from_query(query.as_deref().unwrap_or(""))?;
    let boards = state.store.list_boards(page).await?;
    Ok(Json(boards))
}

/// POST /boards
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<BoardCreate>,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    user.require(&[perm::WRITE])?;
    let board = state.store.create_board(body).await?;
    Ok((StatusCode::CREATED, Json(board)))
}

/// PATCH /boards/:id
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(patch): Json<BoardPatch>,
) -> Result<Json<Board>, ApiError> {
    user.require(&[perm::WRITE])?;
    let board = state.store.update_board(id, patch).await?;
    Ok(Json(board))
}

/// DELETE /boards/:id
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    user.require(&[perm::WRITE])?;
    state.store.delete_board(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
