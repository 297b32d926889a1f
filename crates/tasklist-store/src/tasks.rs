use tracing::instrument;

use tasklist_core::TaskRow;

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers::{row_to_task, TASK_COLUMNS};

/// Parameterized statements over the `tasks` table.
///
/// All methods are synchronous; callers on an async runtime are expected to
/// move them off the worker threads.
#[derive(Clone)]
pub struct TaskRepo {
    db: Database,
}

impl TaskRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All tasks, newest first. Ties on `created_at` fall back to id.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<TaskRow>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC"
            ))?;
            let mut rows = stmt.query([])?;
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(row_to_task(row)?);
            }
            Ok(tasks)
        })
    }

    #[instrument(skip(self), fields(task_id = id))]
    pub fn get(&self, id: i64) -> Result<Option<TaskRow>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => row_to_task(row).map(Some),
                None => Ok(None),
            }
        })
    }

    /// Insert a task and return the id storage assigned to it.
    #[instrument(skip(self, title))]
    pub fn insert(&self, title: &str, completed: bool) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, completed) VALUES (?1, ?2)",
                rusqlite::params![title, i64::from(completed)],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Overwrite title and completion in one statement. Returns rows changed.
    #[instrument(skip(self, title), fields(task_id = id))]
    pub fn update(&self, id: i64, title: &str, completed: bool) -> Result<usize, StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE tasks SET title = ?1, completed = ?2 WHERE id = ?3",
                rusqlite::params![title, i64::from(completed), id],
            )?;
            Ok(changed)
        })
    }

    /// Returns rows removed.
    #[instrument(skip(self), fields(task_id = id))]
    pub fn delete(&self, id: i64) -> Result<usize, StoreError> {
        self.db.with_conn(|conn| Ok(conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?))
    }
}
