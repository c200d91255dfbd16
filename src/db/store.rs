use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;
use thiserror::Error;

use super::models::{
    Board, BoardCreate, BoardPatch, BoardView, Card, CardCreate, CardPatch, CardView, Task,
    TaskCreate, TaskPatch,
};
use crate::middleware::pagination::Pagination;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(&'static str),

    /// A create or re-parenting patch referenced a parent row that does not
    /// exist. Carries the parent's entity name ("Board" / "Card").
    #[error("{0} does not exist")]
    MissingParent(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence capability over the three entity kinds. Every operation is a
/// single logical store call; list results are ordered by ascending id.
#[derive(Clone)]
pub struct EntityStore {
    pool: SqlitePool,
}

impl EntityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // Boards

    pub async fn list_boards(&self, page: Pagination) -> Result<Vec<BoardView>, StoreError> {
        let boards: Vec<Board> =
            sqlx::query_as("SELECT id, title FROM boards ORDER BY id LIMIT ? OFFSET ?")
                .bind(page.limit)
                .bind(page.skip)
                .fetch_all(&self.pool)
                .await?;

        let board_ids: Vec<i64> = boards.iter().map(|b| b.id).collect();
        let cards = self.cards_in_boards(&board_ids).await?;
        let card_ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
        let tasks = self.tasks_in_cards(&card_ids).await?;

        let mut tasks_by_card: HashMap<i64, Vec<Task>> = HashMap::new();
        for task in tasks {
            tasks_by_card.entry(task.card_id).or_default().push(task);
        }

        let mut cards_by_board: HashMap<i64, Vec<CardView>> = HashMap::new();
        for card in cards {
            let tasks = tasks_by_card.remove(&card.id).unwrap_or_default();
            cards_by_board.entry(card.board_id).or_default().push(CardView {
                id: card.id,
                title: card.title,
                board_id: card.board_id,
                tasks,
            });
        }

        Ok(boards
            .into_iter()
            .map(|board| BoardView {
                cards: cards_by_board.remove(&board.id).unwrap_or_default(),
                id: board.id,
                title: board.title,
            })
            .collect())
    }

    pub async fn create_board(&self, fields: BoardCreate) -> Result<Board, StoreError> {
        let board = sqlx::query_as("INSERT INTO boards (title) VALUES (?) RETURNING id, title")
            .bind(fields.title)
            .fetch_one(&self.pool)
            .await?;
        Ok(board)
    }

    pub async fn update_board(&self, id: i64, patch: BoardPatch) -> Result<Board, StoreError> {
        let row: Option<Board> = match patch.title {
            Some(title) => {
                sqlx::query_as("UPDATE boards SET title = ? WHERE id = ? RETURNING id, title")
                    .bind(title)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            // Empty patch: the row itself, untouched
            None => {
                sqlx::query_as("SELECT id, title FROM boards WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        row.ok_or(StoreError::NotFound("Board not found"))
    }

    pub async fn delete_board(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Board not found"));
        }
        Ok(())
    }

    // Cards

    pub async fn list_cards(&self, page: Pagination) -> Result<Vec<CardView>, StoreError> {
        let cards: Vec<Card> =
            sqlx::query_as("SELECT id, title, board_id FROM cards ORDER BY id LIMIT ? OFFSET ?")
                .bind(page.limit)
                .bind(page.skip)
                .fetch_all(&self.pool)
                .await?;

        let card_ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
        let tasks = self.tasks_in_cards(&card_ids).await?;

        let mut tasks_by_card: HashMap<i64, Vec<Task>> = HashMap::new();
        for task in tasks {
            tasks_by_card.entry(task.card_id).or_default().push(task);
        }

        Ok(cards
            .into_iter()
            .map(|card| CardView {
                tasks: tasks_by_card.remove(&card.id).unwrap_or_default(),
                id: card.id,
                title: card.title,
                board_id: card.board_id,
            })
            .collect())
    }

    pub async fn create_card(&self, fields: CardCreate) -> Result<Card, StoreError> {
        // Parent must exist before insertion; a bare FK violation is not a
        // client-friendly answer.
        self.board_exists(fields.board_id).await?;

        let card = sqlx::query_as(
            "INSERT INTO cards (title, board_id) VALUES (?, ?) RETURNING id, title, board_id",
        )
        .bind(fields.title)
        .bind(fields.board_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_fk(e, "Board"))?;
        Ok(card)
    }

    pub async fn update_card(&self, id: i64, patch: CardPatch) -> Result<Card, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE cards SET ");
        let mut any = false;
        {
            let mut sets = qb.separated(", ");
            if let Some(title) = &patch.title {
                sets.push("title = ");
                sets.push_bind_unseparated(title);
                any = true;
            }
            if let Some(board_id) = patch.board_id {
                sets.push("board_id = ");
                sets.push_bind_unseparated(board_id);
                any = true;
            }
        }

        if !any {
            let row: Option<Card> = sqlx::query_as("SELECT id, title, board_id FROM cards WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            return row.ok_or(StoreError::NotFound("Card not found"));
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING id, title, board_id");

        let row: Option<Card> = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_fk(e, "Board"))?;
        row.ok_or(StoreError::NotFound("Card not found"))
    }

    pub async fn delete_card(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Card not found"));
        }
        Ok(())
    }

    // Tasks

    pub async fn list_tasks(
        &self,
        card_id: Option<i64>,
        page: Pagination,
    ) -> Result<Vec<Task>, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id, text, card_id FROM tasks");
        if let Some(card_id) = card_id {
            qb.push(" WHERE card_id = ");
            qb.push_bind(card_id);
        }
        qb.push(" ORDER BY id LIMIT ");
        qb.push_bind(page.limit);
        qb.push(" OFFSET ");
        qb.push_bind(page.skip);

        let tasks = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    pub async fn create_task(&self, fields: TaskCreate) -> Result<Task, StoreError> {
        self.card_exists(fields.card_id).await?;

        let task = sqlx::query_as(
            "INSERT INTO tasks (text, card_id) VALUES (?, ?) RETURNING id, text, card_id",
        )
        .bind(fields.text)
        .bind(fields.card_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_fk(e, "Card"))?;
        Ok(task)
    }

    pub async fn update_task(&self, id: i64, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE tasks SET ");
        let mut any = false;
        {
            let mut sets = qb.separated(", ");
            if let Some(text) = &patch.text {
                sets.push("text = ");
                sets.push_bind_unseparated(text);
                any = true;
            }
            if let Some(card_id) = patch.card_id {
                sets.push("card_id = ");
                sets.push_bind_unseparated(card_id);
                any = true;
            }
        }

        if !any {
            let row: Option<Task> = sqlx::query_as("SELECT id, text, card_id FROM tasks WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            return row.ok_or(StoreError::NotFound("Task not found"));
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING id, text, card_id");

        let row: Option<Task> = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_fk(e, "Card"))?;
        row.ok_or(StoreError::NotFound("Task not found"))
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Task not found"));
        }
        Ok(())
    }

    // Helpers

    async fn board_exists(&self, id: i64) -> Result<(), StoreError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM boards WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|_| ()).ok_or(StoreError::MissingParent("Board"))
    }

    async fn card_exists(&self, id: i64) -> Result<(), StoreError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM cards WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|_| ()).ok_or(StoreError::MissingParent("Card"))
    }

    async fn cards_in_boards(&self, board_ids: &[i64]) -> Result<Vec<Card>, StoreError> {
        if board_ids.is_empty() {
            return Ok(vec![]);
        }
        let mut qb =
            QueryBuilder::<Sqlite>::new("SELECT id, title, board_id FROM cards WHERE board_id IN (");
        let mut sep = qb.separated(", ");
        for id in board_ids {
            sep.push_bind(*id);
        }
        sep.push_unseparated(") ORDER BY id");
        let cards = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(cards)
    }

    async fn tasks_in_cards(&self, card_ids: &[i64]) -> Result<Vec<Task>, StoreError> {
        if card_ids.is_empty() {
            return Ok(vec![]);
        }
        let mut qb =
            QueryBuilder::<Sqlite>::new("SELECT id, text, card_id FROM tasks WHERE card_id IN (");
        let mut sep = qb.separated(", ");
        for id in card_ids {
            sep.push_bind(*id);
        }
        sep.push_unseparated(") ORDER BY id");
        let tasks = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(tasks)
    }
}

fn map_fk(err: sqlx::Error, parent: &'static str) -> StoreError {
    if let sqlx::Error::Database(ref db) = err {
        if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) {
            return StoreError::MissingParent(parent);
        }
    }
    StoreError::Sqlx(err)
}
