use tasklist_core::TaskRow;

use crate::error::StoreError;

pub const TASK_COLUMNS: &str = "id, title, completed, created_at";

/// Get a required column value from a row, returning CorruptRow on failure.
pub fn get<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}

/// Map a row selected with [`TASK_COLUMNS`].
pub fn row_to_task(row: &rusqlite::Row<'_>) -> Result<TaskRow, StoreError> {
    Ok(TaskRow {
        id: get(row, 0, "tasks", "id")?,
        title: get(row, 1, "tasks", "title")?,
        completed: get(row, 2, "tasks", "completed")?,
        created_at: get(row, 3, "tasks", "created_at")?,
    })
}
