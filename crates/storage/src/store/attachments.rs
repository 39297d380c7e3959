#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::params;
use tl_core::ids::{AttachmentId, CommentId, TaskId, UserId};
use tl_core::model::{Attachment, AttachmentTarget, NewAttachment};
use tl_core::validate::{self, Violation};
use tl_core::{EntityRef, OwnedRef};
use tracing::{debug_span, info};

impl SqliteStore {
    /// Exactly one of `task_id` / `comment_id` must be given; the actor becomes the uploader.
    pub fn create_attachment(
        &mut self,
        actor: UserId,
        request: NewAttachment,
    ) -> Result<Attachment, StoreError> {
        let _span = debug_span!("attachment.create", actor = %actor).entered();

        let target = validate::attachment_target(request.task_id, request.comment_id)?;
        let tx = self.write_tx()?;
        let parent = match target {
            AttachmentTarget::Task(task_id) => EntityRef::Task(task_id),
            AttachmentTarget::Comment(comment_id) => EntityRef::Comment(comment_id),
        };
        authorize_member_tx(&tx, actor, parent)?;
        let filename = validate::required_text("filename", &request.filename)?;
        let url = validate::attachment_url(&request.url)?;

        tx.execute(
            "INSERT INTO attachments(\
               task_id, comment_id, uploader_id, filename, url, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                target.task_id().map(TaskId::get),
                target.comment_id().map(CommentId::get),
                actor.get(),
                filename,
                url,
                now_ms(),
            ],
        )
        .map_err(|err| match constraint_of(&err) {
            Some(Constraint::Check) => StoreError::Invalid(Violation::AttachmentTargetAmbiguous),
            _ => map_write_conflict(err, "attachment parent vanished"),
        })?;
        let attachment_id = AttachmentId::new(tx.last_insert_rowid());
        let attachment = found(attachment_tx(&tx, attachment_id)?, EntityKind::Attachment)?;

        tx.commit()?;
        Ok(attachment)
    }

    pub fn get_attachment(
        &self,
        actor: UserId,
        attachment_id: AttachmentId,
    ) -> Result<Attachment, StoreError> {
        let _span = debug_span!(
            "attachment.get",
            actor = %actor,
            attachment_id = %attachment_id
        )
        .entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Attachment(attachment_id))?;
        found(attachment_tx(&tx, attachment_id)?, EntityKind::Attachment)
    }

    /// Attachments placed directly on the task; comment attachments are listed per comment.
    pub fn list_task_attachments(
        &self,
        actor: UserId,
        task_id: TaskId,
    ) -> Result<Vec<Attachment>, StoreError> {
        let _span =
            debug_span!("attachment.list", actor = %actor, task_id = %task_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {ATTACHMENT_COLUMNS} FROM attachments a WHERE a.task_id = ?1 \
                 ORDER BY a.created_at_ms ASC, a.id ASC"
            ),
            params![task_id.get()],
            attachment_row,
        )
    }

    pub fn list_comment_attachments(
        &self,
        actor: UserId,
        comment_id: CommentId,
    ) -> Result<Vec<Attachment>, StoreError> {
        let _span =
            debug_span!("attachment.list", actor = %actor, comment_id = %comment_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Comment(comment_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {ATTACHMENT_COLUMNS} FROM attachments a WHERE a.comment_id = ?1 \
                 ORDER BY a.created_at_ms ASC, a.id ASC"
            ),
            params![comment_id.get()],
            attachment_row,
        )
    }

    /// Uploader only. The workspace is reached through the task, or the comment's task.
    pub fn delete_attachment(
        &mut self,
        actor: UserId,
        attachment_id: AttachmentId,
    ) -> Result<(), StoreError> {
        let _span = debug_span!(
            "attachment.delete",
            actor = %actor,
            attachment_id = %attachment_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_owner_tx(&tx, actor, OwnedRef::Attachment(attachment_id))?;
        tx.execute(
            "DELETE FROM attachments WHERE id = ?1",
            params![attachment_id.get()],
        )?;

        tx.commit()?;
        info!(actor = %actor, attachment_id = %attachment_id, "attachment deleted");
        Ok(())
    }
}
