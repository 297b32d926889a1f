use serde::{Deserialize, Serialize};

/// Base path every task resource lives under.
pub const TASKS_BASE_PATH: &str = "/api/tasks";

/// A task as persisted. `completed` keeps its storage form (0/1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub completed: i64,
    pub created_at: String,
}

/// Wire representation of a task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResource {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
    pub links: TaskLinks,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Canonical path of a single task.
pub fn task_path(id: i64) -> String {
    format!("{TASKS_BASE_PATH}/{id}")
}

pub fn to_task_resource(row: &TaskRow) -> TaskResource {
    TaskResource {
        id: row.id,
        title: row.title.clone(),
        completed: row.completed != 0,
        created_at: row.created_at.clone(),
        links: TaskLinks {
            self_link: task_path(row.id),
        },
    }
}

/// Map rows in the order storage returned them.
pub fn to_task_collection(rows: &[TaskRow]) -> Vec<TaskResource> {
    rows.iter().map(to_task_resource).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, completed: i64) -> TaskRow {
        TaskRow {
            id,
            title: format!("task {id}"),
            completed,
            created_at: "2026-01-02 03:04:05".into(),
        }
    }

    #[test]
    fn resource_from_row() {
        let resource = to_task_resource(&row(7, 1));
        assert_eq!(resource.id, 7);
        assert_eq!(resource.title, "task 7");
        assert!(resource.completed);
        assert_eq!(resource.created_at, "2026-01-02 03:04:05");
        assert_eq!(resource.links.self_link, "/api/tasks/7");

        assert!(!to_task_resource(&row(8, 0)).completed);
    }

    #[test]
    fn resource_wire_shape() {
        let json = serde_json::to_value(to_task_resource(&row(3, 0))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "title": "task 3",
                "completed": false,
                "createdAt": "2026-01-02 03:04:05",
                "links": {"self": "/api/tasks/3"}
            })
        );
    }

    #[test]
    fn collection_preserves_order() {
        let rows = vec![row(3, 0), row(1, 1), row(2, 0)];
        let ids: Vec<i64> = to_task_collection(&rows).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(to_task_collection(&[]).is_empty());
    }
}
