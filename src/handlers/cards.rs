use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::Json,
};

use crate::auth::perm;
use crate::db::models::{Card, CardCreate, CardPatch, CardView};
use crate::error::ApiError;
use crate::middleware::{AuthUser, Pagination};
use crate::AppState;

/// GET /cards?skip&limit - cards with their tasks expanded
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<CardView>>, ApiError> {
    user.require(&[perm::READ])?;
    let page = Pagination::from_query(query.as_deref().unwrap_or(""))?;
    let cards = state.store.list_cards(page).await?;
    Ok(Json(cards))
}

/// POST /cards - the referenced board must exist (400 otherwise)
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CardCreate>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    user.require(&[perm::WRITE])?;
    let card = state.store.create_card(body).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// PATCH /cards/:id
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(patch): Json<CardPatch>,
) -> Result<Json<Card>, ApiError> {
    user.require(&[perm::WRITE])?;
    let card = state.store.update_card(id, patch).await?;
    Ok(Json(card))
}

/// DELETE /cards/:id
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    user.require(&[perm::WRITE])?;
    state.store.delete_card(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
