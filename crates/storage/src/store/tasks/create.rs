#![forbid(unsafe_code)]

use super::*;
use rusqlite::params;
use tl_core::EntityRef;
use tl_core::model::{NewTask, Task, completion_timestamp};
use tracing::debug_span;

impl SqliteStore {
    /// The actor is recorded as creator. `completed: Some(true)` stamps `completed_at_ms` with now.
    pub fn create_task(&mut self, actor: UserId, request: NewTask) -> Result<Task, StoreError> {
        let _span = debug_span!(
            "task.create",
            actor = %actor,
            project_id = %request.project_id
        )
        .entered();

        let tx = self.write_tx()?;
        let workspace_id = authorize_member_tx(&tx, actor, EntityRef::Project(request.project_id))?;
        let name = validate::required_text("name", &request.name)?;
        if let Some(section_id) = request.section_id {
            check_section_tx(&tx, section_id, request.project_id)?;
        }
        if let Some(parent_task_id) = request.parent_task_id {
            check_parent_tx(&tx, parent_task_id, request.project_id)?;
        }
        if let Some(assignee_id) = request.assignee_id {
            check_assignee_tx(&tx, assignee_id, workspace_id)?;
        }

        let now_ms = now_ms();
        tx.execute(
            "INSERT INTO tasks(project_id, section_id, parent_task_id, assignee_id, creator_id, \
             name, description, due_at_ms, completed_at_ms, position, \
             created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            params![
                request.project_id.get(),
                request.section_id.map(SectionId::get),
                request.parent_task_id.map(TaskId::get),
                request.assignee_id.map(UserId::get),
                actor.get(),
                name,
                request.description,
                request.due_at_ms,
                completion_timestamp(request.completed, None, now_ms),
                request.position,
                now_ms,
            ],
        )?;
        let task_id = TaskId::new(tx.last_insert_rowid());
        let task = found(task_tx(&tx, task_id)?, EntityKind::Task)?;

        tx.commit()?;
        Ok(task)
    }
}
