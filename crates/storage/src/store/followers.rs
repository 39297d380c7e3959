#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::params;
use tl_core::EntityRef;
use tl_core::ids::{TaskId, UserId};
use tl_core::model::User;
use tl_core::validate::{self, MemberRole};
use tracing::debug_span;

impl SqliteStore {
    /// Idempotent. The follower must belong to the task's workspace.
    pub fn follow_task(
        &mut self,
        actor: UserId,
        task_id: TaskId,
        user_id: UserId,
    ) -> Result<(), StoreError> {
        let _span = debug_span!(
            "task.follow",
            actor = %actor,
            task_id = %task_id,
            user_id = %user_id
        )
        .entered();

        let tx = self.write_tx()?;
        let workspace_id = authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        found(user_tx(&tx, user_id)?, EntityKind::User)?;
        validate::workspace_member(
            user_id,
            MemberRole::Follower,
            is_member_tx(&tx, user_id, workspace_id)?,
        )?;

        tx.execute(
            "INSERT OR IGNORE INTO task_followers(task_id, user_id, created_at_ms) \
             VALUES (?1, ?2, ?3)",
            params![task_id.get(), user_id.get(), now_ms()],
        )?;

        tx.commit()?;
        Ok(())
    }

    pub fn unfollow_task(
        &mut self,
        actor: UserId,
        task_id: TaskId,
        user_id: UserId,
    ) -> Result<(), StoreError> {
        let _span = debug_span!(
            "task.unfollow",
            actor = %actor,
            task_id = %task_id,
            user_id = %user_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        let removed = tx.execute(
            "DELETE FROM task_followers WHERE task_id = ?1 AND user_id = ?2",
            params![task_id.get(), user_id.get()],
        )?;
        if removed == 0 {
            return Err(StoreError::NotFound(EntityKind::TaskFollower));
        }

        tx.commit()?;
        Ok(())
    }

    /// In follow order.
    pub fn list_followers(&self, actor: UserId, task_id: TaskId) -> Result<Vec<User>, StoreError> {
        let _span = debug_span!("task.followers", actor = %actor, task_id = %task_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {USER_COLUMNS} FROM task_followers tf JOIN users u ON u.id = tf.user_id \
                 WHERE tf.task_id = ?1 ORDER BY tf.created_at_ms ASC, tf.rowid ASC"
            ),
            params![task_id.get()],
            user_row,
        )
    }
}
