#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::params;
use tl_core::ids::{CommentId, TaskId, UserId};
use tl_core::model::{Comment, NewComment};
use tl_core::patch::CommentPatch;
use tl_core::validate::{self, InputError};
use tl_core::{EntityRef, OwnedRef, Patch};
use tracing::{debug_span, info};

impl SqliteStore {
    pub fn create_comment(
        &mut self,
        actor: UserId,
        task_id: TaskId,
        request: NewComment,
    ) -> Result<Comment, StoreError> {
        let _span = debug_span!("comment.create", actor = %actor, task_id = %task_id).entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        let content = validate::required_text("content", &request.content)?;

        tx.execute(
            "INSERT INTO comments(task_id, author_id, content, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![task_id.get(), actor.get(), content, now_ms()],
        )?;
        let comment_id = CommentId::new(tx.last_insert_rowid());
        let comment = found(comment_tx(&tx, comment_id)?, EntityKind::Comment)?;

        tx.commit()?;
        Ok(comment)
    }

    pub fn get_comment(&self, actor: UserId, comment_id: CommentId) -> Result<Comment, StoreError> {
        let _span =
            debug_span!("comment.get", actor = %actor, comment_id = %comment_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Comment(comment_id))?;
        found(comment_tx(&tx, comment_id)?, EntityKind::Comment)
    }

    /// Oldest first.
    pub fn list_comments(
        &self,
        actor: UserId,
        task_id: TaskId,
    ) -> Result<Vec<Comment>, StoreError> {
        let _span = debug_span!("comment.list", actor = %actor, task_id = %task_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {COMMENT_COLUMNS} FROM comments c WHERE c.task_id = ?1 \
                 ORDER BY c.created_at_ms ASC, c.id ASC"
            ),
            params![task_id.get()],
            comment_row,
        )
    }

    /// Author only.
    pub fn update_comment(
        &mut self,
        actor: UserId,
        comment_id: CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, StoreError> {
        let _span =
            debug_span!("comment.update", actor = %actor, comment_id = %comment_id).entered();

        let tx = self.write_tx()?;
        authorize_owner_tx(&tx, actor, OwnedRef::Comment(comment_id))?;
        let current = found(comment_tx(&tx, comment_id)?, EntityKind::Comment)?;
        if patch.is_empty() {
            return Err(InputError::EmptyPatch.into());
        }
        let patch = CommentPatch {
            content: patch
                .content
                .as_deref()
                .map(|content| validate::required_text("content", content))
                .transpose()?,
        };

        let next = patch.apply(&current, now_ms());
        tx.execute(
            "UPDATE comments SET content = ?2, updated_at_ms = ?3 WHERE id = ?1",
            params![next.id.get(), next.content, next.updated_at_ms],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Author only. Attachments on the comment go with it.
    pub fn delete_comment(
        &mut self,
        actor: UserId,
        comment_id: CommentId,
    ) -> Result<(), StoreError> {
        let _span =
            debug_span!("comment.delete", actor = %actor, comment_id = %comment_id).entered();

        let tx = self.write_tx()?;
        authorize_owner_tx(&tx, actor, OwnedRef::Comment(comment_id))?;
        tx.execute("DELETE FROM comments WHERE id = ?1", params![comment_id.get()])?;

        tx.commit()?;
        info!(actor = %actor, comment_id = %comment_id, "comment deleted");
        Ok(())
    }
}
