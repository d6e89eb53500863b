//! Storage handle injected into the router.
//!
//! # Design
//! Handlers are generic over `TodoStore`, so the router never reaches for a
//! global pool. `MySqlStore` issues exactly one parameterised statement per
//! call against a shared `MySqlPool`; the pool lends a connection for the
//! statement and takes it back when the future completes or is dropped.
//! `MemoryStore` keeps the table in process and backs the router tests.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::MySqlPool;
use thiserror::Error;
use todo_core::{Todo, TodoFields};
use tokio::sync::RwLock;

/// Result of an INSERT, UPDATE or DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub rows_affected: u64,
    /// Only meaningful for inserts.
    pub last_insert_id: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Failure reported by a non-SQL backend.
    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    /// The engine's own error text, without any wrapper prefix.
    pub fn message(&self) -> String {
        match self {
            StoreError::Database(sqlx::Error::Database(db)) => db.message().to_string(),
            StoreError::Database(other) => other.to_string(),
            StoreError::Backend(message) => message.clone(),
        }
    }
}

pub trait TodoStore: Clone + Send + Sync + 'static {
    /// Every row, in whatever order the backend yields them.
    fn list(&self) -> impl Future<Output = Result<Vec<Todo>, StoreError>> + Send;

    fn insert(
        &self,
        fields: &TodoFields,
    ) -> impl Future<Output = Result<WriteOutcome, StoreError>> + Send;

    /// Overwrite all four mutable columns of row `id`.
    fn update(
        &self,
        id: u64,
        fields: &TodoFields,
    ) -> impl Future<Output = Result<WriteOutcome, StoreError>> + Send;

    fn delete(&self, id: u64) -> impl Future<Output = Result<WriteOutcome, StoreError>> + Send;
}

// ---------------------------------------------------------------------------
// MySQL
// ---------------------------------------------------------------------------

// The casts pin the decoded column types whatever integer width or
// DATE/DATETIME flavour the table was created with.
const SELECT_ALL: &str = "SELECT CAST(id AS UNSIGNED) AS id, task, description, category, \
                          CAST(date AS DATE) AS date FROM todo";
const INSERT: &str = "INSERT INTO todo (task, description, category, date) VALUES (?, ?, ?, ?)";
const UPDATE: &str =
    "UPDATE todo SET task = ?, description = ?, category = ?, date = ? WHERE id = ?";
const DELETE: &str = "DELETE FROM todo WHERE id = ?";

#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    id: u64,
    task: String,
    description: Option<String>,
    category: Option<String>,
    date: Option<NaiveDate>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.id,
            task: row.task,
            description: row.description,
            category: row.category,
            date: row.date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl TodoStore for MySqlStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let rows = sqlx::query_as::<_, TodoRow>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn insert(&self, fields: &TodoFields) -> Result<WriteOutcome, StoreError> {
        let result = sqlx::query(INSERT)
            .bind(&fields.task)
            .bind(&fields.description)
            .bind(&fields.category)
            .bind(fields.date)
            .execute(&self.pool)
            .await?;
        Ok(WriteOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }

    async fn update(&self, id: u64, fields: &TodoFields) -> Result<WriteOutcome, StoreError> {
        let result = sqlx::query(UPDATE)
            .bind(&fields.task)
            .bind(&fields.description)
            .bind(&fields.category)
            .bind(fields.date)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(WriteOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: 0,
        })
    }

    async fn delete(&self, id: u64) -> Result<WriteOutcome, StoreError> {
        let result = sqlx::query(DELETE).bind(id).execute(&self.pool).await?;
        Ok(WriteOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: 0,
        })
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryTable {
    rows: BTreeMap<u64, Todo>,
    /// Last id handed out; ids are never reused, even after a delete.
    last_id: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<RwLock<MemoryTable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn outcome(rows_affected: u64) -> WriteOutcome {
    WriteOutcome {
        rows_affected,
        last_insert_id: 0,
    }
}

impl TodoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn insert(&self, fields: &TodoFields) -> Result<WriteOutcome, StoreError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(
            id,
            Todo {
                id,
                task: fields.task.clone(),
                description: fields.description.clone(),
                category: fields.category.clone(),
                date: fields.date,
            },
        );
        Ok(WriteOutcome {
            rows_affected: 1,
            last_insert_id: id,
        })
    }

    async fn update(&self, id: u64, fields: &TodoFields) -> Result<WriteOutcome, StoreError> {
        let mut table = self.table.write().await;
        let Some(todo) = table.rows.get_mut(&id) else {
            return Ok(outcome(0));
        };
        todo.task = fields.task.clone();
        todo.description = fields.description.clone();
        todo.category = fields.category.clone();
        todo.date = fields.date;
        Ok(outcome(1))
    }

    async fn delete(&self, id: u64) -> Result<WriteOutcome, StoreError> {
        let mut table = self.table.write().await;
        Ok(outcome(table.rows.remove(&id).map_or(0, |_| 1)))
    }
}
