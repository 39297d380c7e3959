#![forbid(unsafe_code)]

use super::*;
use rusqlite::params;
use tl_core::EntityRef;
use tl_core::model::Task;
use tracing::debug_span;

impl SqliteStore {
    pub fn get_task(&self, actor: UserId, task_id: TaskId) -> Result<Task, StoreError> {
        let _span = debug_span!("task.get", actor = %actor, task_id = %task_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        found(task_tx(&tx, task_id)?, EntityKind::Task)
    }

    /// Direct children only, newest first.
    pub fn list_subtasks(&self, actor: UserId, task_id: TaskId) -> Result<Vec<Task>, StoreError> {
        let _span = debug_span!("task.subtasks", actor = %actor, task_id = %task_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {TASK_COLUMNS} FROM tasks t WHERE t.parent_task_id = ?1 \
                 ORDER BY t.created_at_ms DESC, t.id DESC"
            ),
            params![task_id.get()],
            task_row,
        )
    }
}
