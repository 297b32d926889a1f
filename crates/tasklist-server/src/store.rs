//! Async facade over [`TaskRepo`].
//!
//! SQLite calls are blocking, so each one runs on the blocking pool and the
//! handler only awaits its completion.

use tasklist_core::{ApiError, ApiResult, TaskRow};
use tasklist_store::{Database, StoreError, TaskRepo};

#[derive(Clone)]
pub struct TaskStore {
    repo: TaskRepo,
}

impl TaskStore {
    pub fn new(db: Database) -> Self {
        Self {
            repo: TaskRepo::new(db),
        }
    }

    async fn run<F, T>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&TaskRepo) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let repo = self.repo.clone();
        let result = tokio::task::spawn_blocking(move || op(&repo))
            .await
            .map_err(|e| ApiError::internal(format!("storage task failed: {e}")))?;
        result.map_err(ApiError::from)
    }

    pub async fn list(&self) -> ApiResult<Vec<TaskRow>> {
        self.run(|repo| repo.list()).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Option<TaskRow>> {
        self.run(move |repo| repo.get(id)).await
    }

    pub async fn insert(&self, title: String, completed: bool) -> ApiResult<i64> {
        self.run(move |repo| repo.insert(&title, completed)).await
    }

    pub async fn update(&self, id: i64, title: String, completed: bool) -> ApiResult<usize> {
        self.run(move |repo| repo.update(id, &title, completed)).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<usize> {
        self.run(move |repo| repo.delete(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TaskStore {
        TaskStore::new(Database::in_memory().unwrap())
    }

    #[tokio::test]
    async fn insert_get_delete() {
        let store = store();
        let id = store.insert("walk dog".into(), false).await.unwrap();
        let row = store.get(id).await.unwrap().unwrap();
        assert_eq!(row.title, "walk dog");
        assert_eq!(store.update(id, "walk cat".into(), true).await.unwrap(), 1);

        assert_eq!(store.delete(id).await.unwrap(), 1);
        assert!(store.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn storage_failure_is_internal() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute_batch("DROP TABLE tasks")?;
            Ok(())
        })
        .unwrap();
        let store = TaskStore::new(db);

        let err = store.list().await.unwrap_err();
        assert!(err.is_internal());
        assert_eq!(err.client_message(), "Internal Server Error");
    }

    #[tokio::test]
    async fn panicking_operation_is_internal() {
        let store = store();
        let err = store
            .run::<_, ()>(|_| panic!("boom"))
            .await
            .unwrap_err();
        assert!(err.is_internal());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_get_distinct_ids() {
        let store = store();
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(format!("task {i}"), i % 2 == 0).await.unwrap()
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(store.list().await.unwrap().len(), 16);
    }
}
