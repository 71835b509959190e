//! SQLite persistence for todos.
//!
//! # Design
//! One `rusqlite::Connection` is opened at startup and shared by every
//! request behind a mutex. Each public method moves exactly one
//! parameterized statement onto tokio's blocking pool, so the calling task
//! suspends while SQLite works. Enum columns are stored as their wire
//! spelling and the due date as `yyyy-MM-dd` text.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use todo_core::{DueDate, FilterShape, Todo};

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS todo (
    id INTEGER PRIMARY KEY,
    todo TEXT NOT NULL,
    priority TEXT NOT NULL,
    status TEXT NOT NULL,
    category TEXT NOT NULL,
    due_date TEXT NOT NULL
);
";

const COLUMNS: &str = "id, todo, priority, status, category, due_date";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Insert collided with an existing primary key.
    #[error("Todo Already Exists")]
    Conflict { id: i64 },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value no longer parses into its domain type.
    #[error("corrupt {column} column: {value:?}")]
    Corrupt { column: &'static str, value: String },

    /// The blocking task running a statement panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Shared handle to the todo table.
#[derive(Clone)]
pub struct TodoStore {
    conn: Arc<Mutex<Connection>>,
}

impl TodoStore {
    /// Open (or create) the database at `path` and ensure the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || f(&conn.lock())).await?
    }

    /// Rows matching `shape` whose text contains `search_q`, case-insensitively.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, shape: &FilterShape, search_q: &str) -> Result<Vec<Todo>, StoreError> {
        let predicate = shape.predicate(search_q);
        let sql = format!("SELECT {COLUMNS} FROM todo WHERE {} ORDER BY id", predicate.clause);

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(predicate.values.iter()), TodoRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter().map(TodoRow::into_todo).collect()
        })
        .await
    }

    /// Rows due on `date`.
    #[tracing::instrument(skip(self))]
    pub async fn agenda(&self, date: DueDate) -> Result<Vec<Todo>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {COLUMNS} FROM todo WHERE due_date = ?1 ORDER BY id"))?;
            let rows = stmt
                .query_map(params![date.to_string()], TodoRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter().map(TodoRow::into_todo).collect()
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {COLUMNS} FROM todo WHERE id = ?1"),
                    params![id],
                    TodoRow::from_row,
                )
                .optional()?;
            row.map(TodoRow::into_todo).transpose()
        })
        .await
    }

    /// Insert a new row. A duplicate id is reported as `StoreError::Conflict`.
    #[tracing::instrument(skip(self, todo), fields(id = todo.id))]
    pub async fn insert(&self, todo: &Todo) -> Result<(), StoreError> {
        let todo = todo.clone();
        self.with_conn(move |conn| {
            let result = conn.execute(
                "INSERT INTO todo (id, todo, priority, status, category, due_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    todo.id,
                    todo.todo,
                    todo.priority.as_str(),
                    todo.status.as_str(),
                    todo.category.as_str(),
                    todo.due_date.to_string(),
                ],
            );
            match result {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::Conflict { id: todo.id })
                }
                Err(err) => Err(err.into()),
            }
        })
        .await
    }

    /// Overwrite every column of the row with `todo.id`. Returns `false` when
    /// no such row exists.
    #[tracing::instrument(skip(self, todo), fields(id = todo.id))]
    pub async fn update(&self, todo: &Todo) -> Result<bool, StoreError> {
        let todo = todo.clone();
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE todo
                 SET todo = ?2, priority = ?3, status = ?4, category = ?5, due_date = ?6
                 WHERE id = ?1",
                params![
                    todo.id,
                    todo.todo,
                    todo.priority.as_str(),
                    todo.status.as_str(),
                    todo.category.as_str(),
                    todo.due_date.to_string(),
                ],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    /// Delete by id. Returns whether a row was removed.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let changed = conn.execute("DELETE FROM todo WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
        .await
    }
}

/// A row as stored, before the text columns are parsed.
struct TodoRow {
    id: i64,
    todo: String,
    priority: String,
    status: String,
    category: String,
    due_date: String,
}

impl TodoRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            todo: row.get("todo")?,
            priority: row.get("priority")?,
            status: row.get("status")?,
            category: row.get("category")?,
            due_date: row.get("due_date")?,
        })
    }

    fn into_todo(self) -> Result<Todo, StoreError> {
        Ok(Todo {
            id: self.id,
            todo: self.todo,
            priority: parse_column("priority", self.priority)?,
            status: parse_column("status", self.status)?,
            category: parse_column("category", self.category)?,
            due_date: parse_column("due_date", self.due_date)?,
        })
    }
}

fn parse_column<T: FromStr>(column: &'static str, value: String) -> Result<T, StoreError> {
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(StoreError::Corrupt { column, value }),
    }
}
