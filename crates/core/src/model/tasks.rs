#![forbid(unsafe_code)]

use crate::ids::{ProjectId, SectionId, TaskId, UserId};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// A task row. Completion is derived from `completed_at_ms`; there is no stored flag.
///
/// The JSON form carries a computed `completed` key; it is ignored when read back.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub section_id: Option<SectionId>,
    pub parent_task_id: Option<TaskId>,
    pub assignee_id: Option<UserId>,
    pub creator_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub due_at_ms: Option<i64>,
    pub completed_at_ms: Option<i64>,
    pub position: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Task {
    pub fn completed(&self) -> bool {
        self.completed_at_ms.is_some()
    }
}

impl Serialize for Task {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("Task", 14)?;
        body.serialize_field("id", &self.id)?;
        body.serialize_field("project_id", &self.project_id)?;
        body.serialize_field("section_id", &self.section_id)?;
        body.serialize_field("parent_task_id", &self.parent_task_id)?;
        body.serialize_field("assignee_id", &self.assignee_id)?;
        body.serialize_field("creator_id", &self.creator_id)?;
        body.serialize_field("name", &self.name)?;
        body.serialize_field("description", &self.description)?;
        body.serialize_field("due_at_ms", &self.due_at_ms)?;
        body.serialize_field("completed", &self.completed())?;
        body.serialize_field("completed_at_ms", &self.completed_at_ms)?;
        body.serialize_field("position", &self.position)?;
        body.serialize_field("created_at_ms", &self.created_at_ms)?;
        body.serialize_field("updated_at_ms", &self.updated_at_ms)?;
        body.end()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewTask {
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub section_id: Option<SectionId>,
    #[serde(default)]
    pub parent_task_id: Option<TaskId>,
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    #[serde(default)]
    pub due_at_ms: Option<i64>,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl NewTask {
    pub fn named(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            description: None,
            section_id: None,
            parent_task_id: None,
            assignee_id: None,
            due_at_ms: None,
            position: 0,
            completed: None,
        }
    }
}

/// Maps the write-only `completed` flag onto `completed_at_ms`.
///
/// `Some(true)` stamps `now_ms`, `Some(false)` clears, `None` keeps `current`.
pub fn completion_timestamp(
    flag: Option<bool>,
    current: Option<i64>,
    now_ms: i64,
) -> Option<i64> {
    match flag {
        Some(true) => Some(now_ms),
        Some(false) => None,
        None => current,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskPage {
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
    pub items: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(completed_at_ms: Option<i64>) -> Task {
        Task {
            id: TaskId::new(7),
            project_id: ProjectId::new(2),
            section_id: None,
            parent_task_id: None,
            assignee_id: None,
            creator_id: UserId::new(1),
            name: "ship".to_string(),
            description: None,
            due_at_ms: None,
            completed_at_ms,
            position: 0,
            created_at_ms: 10,
            updated_at_ms: 10,
        }
    }

    #[test]
    fn json_body_reports_completion_from_the_timestamp() {
        let open = serde_json::to_value(task(None)).expect("serialize open task");
        assert_eq!(open["completed"], json!(false));
        assert_eq!(open["completed_at_ms"], json!(null));

        let done = serde_json::to_value(task(Some(42))).expect("serialize done task");
        assert_eq!(done["completed"], json!(true));
        assert_eq!(done["completed_at_ms"], json!(42));

        let echoed: Task = serde_json::from_value(done).expect("read back");
        assert_eq!(echoed, task(Some(42)));
    }

    #[test]
    fn completion_flag_maps_onto_the_timestamp() {
        assert_eq!(completion_timestamp(Some(true), None, 5), Some(5));
        assert_eq!(completion_timestamp(Some(false), Some(3), 5), None);
        assert_eq!(completion_timestamp(None, Some(3), 5), Some(3));
    }
}
