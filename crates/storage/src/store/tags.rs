#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::{OptionalExtension, Transaction, params};
use tl_core::ids::{TagId, TaskId, UserId, WorkspaceId};
use tl_core::model::{NewTag, Tag};
use tl_core::patch::TagPatch;
use tl_core::validate::{self, InputError};
use tl_core::{EntityRef, Patch};
use tracing::{debug_span, info};

const TAG_NAME_TAKEN: &str = "tag name already used in this workspace";

impl SqliteStore {
    /// Tag names are unique per workspace.
    pub fn create_tag(&mut self, actor: UserId, request: NewTag) -> Result<Tag, StoreError> {
        let _span = debug_span!(
            "tag.create",
            actor = %actor,
            workspace_id = %request.workspace_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Workspace(request.workspace_id))?;
        let name = validate::required_text("name", &request.name)?;
        if tag_name_taken_tx(&tx, request.workspace_id, &name, None)? {
            return Err(StoreError::Conflict(TAG_NAME_TAKEN));
        }

        tx.execute(
            "INSERT INTO tags(workspace_id, name, color, created_at_ms) VALUES (?1, ?2, ?3, ?4)",
            params![request.workspace_id.get(), name, request.color, now_ms()],
        )
        .map_err(|err| map_write_conflict(err, TAG_NAME_TAKEN))?;
        let tag_id = TagId::new(tx.last_insert_rowid());
        let tag = found(tag_tx(&tx, tag_id)?, EntityKind::Tag)?;

        tx.commit()?;
        Ok(tag)
    }

    pub fn get_tag(&self, actor: UserId, tag_id: TagId) -> Result<Tag, StoreError> {
        let _span = debug_span!("tag.get", actor = %actor, tag_id = %tag_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Tag(tag_id))?;
        found(tag_tx(&tx, tag_id)?, EntityKind::Tag)
    }

    /// Alphabetical.
    pub fn list_tags(
        &self,
        actor: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Tag>, StoreError> {
        let _span =
            debug_span!("tag.list", actor = %actor, workspace_id = %workspace_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Workspace(workspace_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {TAG_COLUMNS} FROM tags g WHERE g.workspace_id = ?1 \
                 ORDER BY g.name ASC, g.id ASC"
            ),
            params![workspace_id.get()],
            tag_row,
        )
    }

    /// A rename is re-checked against the other tags of the workspace.
    pub fn update_tag(
        &mut self,
        actor: UserId,
        tag_id: TagId,
        patch: TagPatch,
    ) -> Result<Tag, StoreError> {
        let _span = debug_span!("tag.update", actor = %actor, tag_id = %tag_id).entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Tag(tag_id))?;
        let current = found(tag_tx(&tx, tag_id)?, EntityKind::Tag)?;
        if patch.is_empty() {
            return Err(InputError::EmptyPatch.into());
        }
        let patch = TagPatch {
            name: patch
                .name
                .as_deref()
                .map(|name| validate::required_text("name", name))
                .transpose()?,
            ..patch
        };
        if let Some(name) = patch.name.as_deref()
            && tag_name_taken_tx(&tx, current.workspace_id, name, Some(tag_id))?
        {
            return Err(StoreError::Conflict(TAG_NAME_TAKEN));
        }

        let next = patch.apply(&current, now_ms());
        tx.execute(
            "UPDATE tags SET name = ?2, color = ?3 WHERE id = ?1",
            params![next.id.get(), next.name, next.color],
        )
        .map_err(|err| map_write_conflict(err, TAG_NAME_TAKEN))?;

        tx.commit()?;
        Ok(next)
    }

    /// Links to tasks go with the tag; the tasks stay.
    pub fn delete_tag(&mut self, actor: UserId, tag_id: TagId) -> Result<(), StoreError> {
        let _span = debug_span!("tag.delete", actor = %actor, tag_id = %tag_id).entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Tag(tag_id))?;
        tx.execute("DELETE FROM tags WHERE id = ?1", params![tag_id.get()])?;

        tx.commit()?;
        info!(actor = %actor, tag_id = %tag_id, "tag deleted");
        Ok(())
    }

    /// Idempotent. The tag must come from the task's workspace.
    pub fn tag_task(
        &mut self,
        actor: UserId,
        task_id: TaskId,
        tag_id: TagId,
    ) -> Result<(), StoreError> {
        let _span = debug_span!(
            "tag.assign",
            actor = %actor,
            task_id = %task_id,
            tag_id = %tag_id
        )
        .entered();

        let tx = self.write_tx()?;
        let workspace_id = authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        let tag = found(tag_tx(&tx, tag_id)?, EntityKind::Tag)?;
        validate::tag_assignment(&tag, workspace_id)?;

        tx.execute(
            "INSERT OR IGNORE INTO task_tags(task_id, tag_id, created_at_ms) VALUES (?1, ?2, ?3)",
            params![task_id.get(), tag_id.get(), now_ms()],
        )?;

        tx.commit()?;
        Ok(())
    }

    pub fn untag_task(
        &mut self,
        actor: UserId,
        task_id: TaskId,
        tag_id: TagId,
    ) -> Result<(), StoreError> {
        let _span = debug_span!(
            "tag.unassign",
            actor = %actor,
            task_id = %task_id,
            tag_id = %tag_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        let removed = tx.execute(
            "DELETE FROM task_tags WHERE task_id = ?1 AND tag_id = ?2",
            params![task_id.get(), tag_id.get()],
        )?;
        if removed == 0 {
            return Err(StoreError::NotFound(EntityKind::TaskTag));
        }

        tx.commit()?;
        Ok(())
    }

    pub fn list_task_tags(&self, actor: UserId, task_id: TaskId) -> Result<Vec<Tag>, StoreError> {
        let _span = debug_span!("tag.list_for_task", actor = %actor, task_id = %task_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Task(task_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {TAG_COLUMNS} FROM task_tags tt JOIN tags g ON g.id = tt.tag_id \
                 WHERE tt.task_id = ?1 ORDER BY g.name ASC, g.id ASC"
            ),
            params![task_id.get()],
            tag_row,
        )
    }
}

fn tag_name_taken_tx(
    tx: &Transaction<'_>,
    workspace_id: WorkspaceId,
    name: &str,
    except: Option<TagId>,
) -> Result<bool, StoreError> {
    Ok(tx
        .query_row(
            "SELECT id FROM tags WHERE workspace_id = ?1 AND name = ?2",
            params![workspace_id.get(), name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some_and(|id| Some(TagId::new(id)) != except))
}
