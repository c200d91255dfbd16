use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Top-level entity. Owns zero or more cards.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Board {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i64,
    pub title: String,
    pub board_id: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub card_id: i64,
}

/// Board with its cards expanded two levels deep (cards, each with tasks).
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub id: i64,
    pub title: String,
    pub cards: Vec<CardView>,
}

/// Card with its tasks expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: i64,
    pub title: String,
    pub board_id: i64,
    pub tasks: Vec<Task>,
}

// Create payloads. Ids are store-assigned, never client-supplied.

#[derive(Debug, Deserialize)]
pub struct BoardCreate {
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCreate {
    pub title: String,
    pub board_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreate {
    pub text: String,
    pub card_id: i64,
}

// Patch payloads: absent fields are left untouched.

#[derive(Debug, Default, Deserialize)]
pub struct BoardPatch {
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
    pub title: Option<String>,
    pub board_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub text: Option<String>,
    pub card_id: Option<i64>,
}
