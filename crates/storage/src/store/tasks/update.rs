#![forbid(unsafe_code)]

use super::*;
use rusqlite::params;
use tl_core::model::Task;
use tl_core::patch::TaskPatch;
use tl_core::validate::InputError;
use tl_core::{EntityRef, Patch};
use tracing::{debug_span, info};

impl SqliteStore {
    /// Omitted fields stay as they are. `completed` maps onto `completed_at_ms`: `Some(true)`
    /// stamps now (also for an already completed task), `Some(false)` clears it.
    pub fn update_task(
        &mut self,
        actor: UserId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        let _span = debug_span!("task.update", actor = %actor, task_id = %task_id).entered();

        let tx = self.write_tx()?;
        let workspace_id = authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        let current = found(task_tx(&tx, task_id)?, EntityKind::Task)?;
        if patch.is_empty() {
            return Err(InputError::EmptyPatch.into());
        }
        let patch = TaskPatch {
            name: patch
                .name
                .as_deref()
                .map(|name| validate::required_text("name", name))
                .transpose()?,
            ..patch
        };
        if let Some(Some(section_id)) = patch.section_id {
            check_section_tx(&tx, section_id, current.project_id)?;
        }
        if let Some(Some(assignee_id)) = patch.assignee_id {
            check_assignee_tx(&tx, assignee_id, workspace_id)?;
        }

        let next = patch.apply(&current, now_ms());
        tx.execute(
            "UPDATE tasks SET section_id = ?2, assignee_id = ?3, name = ?4, description = ?5, \
             due_at_ms = ?6, completed_at_ms = ?7, position = ?8, updated_at_ms = ?9 \
             WHERE id = ?1",
            params![
                next.id.get(),
                next.section_id.map(SectionId::get),
                next.assignee_id.map(UserId::get),
                next.name,
                next.description,
                next.due_at_ms,
                next.completed_at_ms,
                next.position,
                next.updated_at_ms,
            ],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Subtasks, comments (with their attachments), attachments, tag links, field values and
    /// followers go with the task.
    pub fn delete_task(&mut self, actor: UserId, task_id: TaskId) -> Result<(), StoreError> {
        let _span = debug_span!("task.delete", actor = %actor, task_id = %task_id).entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        tx.execute("DELETE FROM tasks WHERE id = ?1", params![task_id.get()])?;

        tx.commit()?;
        info!(actor = %actor, task_id = %task_id, "task deleted");
        Ok(())
    }
}
