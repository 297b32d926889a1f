#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("corrupt row in {table}.{column}: {detail}")]
    CorruptRow {
        table: &'static str,
        column: &'static str,
        detail: String,
    },

    #[error("IO error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Missing rows surface as `None` or a zero row count, so every store error is a 500.
impl From<StoreError> for tasklist_core::ApiError {
    fn from(e: StoreError) -> Self {
        Self::Internal(e.to_string())
    }
}
