#![forbid(unsafe_code)]

//! Membership Authority.
//!
//! Every predicate is a fresh query against the transaction it is handed. Nothing is cached between
//! calls, so a membership revoked by a committed writer is visible to the next operation.

use super::*;
use rusqlite::{OptionalExtension, Transaction, params};
use tl_core::ids::{TeamId, UserId, WorkspaceId};
use tl_core::{EntityRef, OwnedRef};
use tracing::debug;

impl SqliteStore {
    pub fn is_member(
        &self,
        user_id: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<bool, StoreError> {
        let tx = self.read_tx()?;
        is_member_tx(&tx, user_id, workspace_id)
    }

    pub fn is_team_member(&self, user_id: UserId, team_id: TeamId) -> Result<bool, StoreError> {
        let tx = self.read_tx()?;
        is_team_member_tx(&tx, user_id, team_id)
    }

    /// `false` when the entity is absent or has no owner.
    pub fn is_owner(&self, user_id: UserId, owned: OwnedRef) -> Result<bool, StoreError> {
        let tx = self.read_tx()?;
        Ok(owner_of_tx(&tx, owned)?.flatten() == Some(user_id))
    }

    /// Walks the ownership chain up to the workspace. `None` when any link is missing.
    pub fn resolve_workspace(&self, entity: EntityRef) -> Result<Option<WorkspaceId>, StoreError> {
        let tx = self.read_tx()?;
        resolve_workspace_tx(&tx, entity)
    }
}

pub(super) fn is_member_tx(
    tx: &Transaction<'_>,
    user_id: UserId,
    workspace_id: WorkspaceId,
) -> Result<bool, StoreError> {
    Ok(tx
        .query_row(
            "SELECT 1 FROM workspace_members WHERE workspace_id = ?1 AND user_id = ?2",
            params![workspace_id.get(), user_id.get()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some())
}

pub(super) fn is_team_member_tx(
    tx: &Transaction<'_>,
    user_id: UserId,
    team_id: TeamId,
) -> Result<bool, StoreError> {
    Ok(tx
        .query_row(
            "SELECT 1 FROM team_members WHERE team_id = ?1 AND user_id = ?2",
            params![team_id.get(), user_id.get()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some())
}

pub(super) fn resolve_workspace_tx(
    tx: &Transaction<'_>,
    entity: EntityRef,
) -> Result<Option<WorkspaceId>, StoreError> {
    let (sql, id) = match entity {
        EntityRef::Workspace(id) => ("SELECT w.id FROM workspaces w WHERE w.id = ?1", id.get()),
        EntityRef::Team(id) => ("SELECT tm.workspace_id FROM teams tm WHERE tm.id = ?1", id.get()),
        EntityRef::Project(id) => (
            "SELECT p.workspace_id FROM projects p WHERE p.id = ?1",
            id.get(),
        ),
        EntityRef::Section(id) => (
            "SELECT p.workspace_id FROM sections s \
             JOIN projects p ON p.id = s.project_id \
             WHERE s.id = ?1",
            id.get(),
        ),
        EntityRef::Task(id) => (
            "SELECT p.workspace_id FROM tasks t \
             JOIN projects p ON p.id = t.project_id \
             WHERE t.id = ?1",
            id.get(),
        ),
        EntityRef::Comment(id) => (
            "SELECT p.workspace_id FROM comments c \
             JOIN tasks t ON t.id = c.task_id \
             JOIN projects p ON p.id = t.project_id \
             WHERE c.id = ?1",
            id.get(),
        ),
        // The attachment's task is either direct or reached through its comment.
        EntityRef::Attachment(id) => (
            "SELECT p.workspace_id FROM attachments a \
             LEFT JOIN comments c ON c.id = a.comment_id \
             JOIN tasks t ON t.id = COALESCE(a.task_id, c.task_id) \
             JOIN projects p ON p.id = t.project_id \
             WHERE a.id = ?1",
            id.get(),
        ),
        EntityRef::Tag(id) => ("SELECT g.workspace_id FROM tags g WHERE g.id = ?1", id.get()),
        EntityRef::CustomField(id) => (
            "SELECT p.workspace_id FROM custom_fields f \
             JOIN projects p ON p.id = f.project_id \
             WHERE f.id = ?1",
            id.get(),
        ),
    };

    Ok(tx
        .query_row(sql, params![id], |row| row.get::<_, i64>(0))
        .optional()?
        .map(WorkspaceId::new))
}

/// Outer `None`: the entity does not exist. Inner `None`: it exists without an owner.
pub(super) fn owner_of_tx(
    tx: &Transaction<'_>,
    owned: OwnedRef,
) -> Result<Option<Option<UserId>>, StoreError> {
    let (sql, id) = match owned {
        OwnedRef::Workspace(id) => (
            "SELECT w.owner_id FROM workspaces w WHERE w.id = ?1",
            id.get(),
        ),
        OwnedRef::Project(id) => ("SELECT p.owner_id FROM projects p WHERE p.id = ?1", id.get()),
        OwnedRef::Comment(id) => ("SELECT c.author_id FROM comments c WHERE c.id = ?1", id.get()),
        OwnedRef::Attachment(id) => {
            ("SELECT a.uploader_id FROM attachments a WHERE a.id = ?1", id.get())
        }
        OwnedRef::CustomField(id) => (
            "SELECT p.owner_id FROM custom_fields f \
             JOIN projects p ON p.id = f.project_id \
             WHERE f.id = ?1",
            id.get(),
        ),
    };

    Ok(tx
        .query_row(sql, params![id], |row| row.get::<_, Option<i64>>(0))
        .optional()?
        .map(|owner| owner.map(UserId::new)))
}

/// Resolves the entity's workspace and requires a membership row for `actor`.
///
/// Absent entity: `NotFound`. Present but foreign: `Forbidden`.
pub(super) fn authorize_member_tx(
    tx: &Transaction<'_>,
    actor: UserId,
    entity: EntityRef,
) -> Result<WorkspaceId, StoreError> {
    let workspace_id = found(resolve_workspace_tx(tx, entity)?, entity.kind())?;
    ensure_member_tx(tx, actor, workspace_id)?;
    Ok(workspace_id)
}

/// Membership of an already-resolved workspace.
pub(super) fn ensure_member_tx(
    tx: &Transaction<'_>,
    actor: UserId,
    workspace_id: WorkspaceId,
) -> Result<(), StoreError> {
    if !is_member_tx(tx, actor, workspace_id)? {
        debug!(actor = %actor, workspace_id = %workspace_id, stage = "membership", "denied");
        return Err(StoreError::Forbidden(Denial::NotMember { workspace_id }));
    }
    Ok(())
}

/// Membership first, then ownership of the entity itself.
pub(super) fn authorize_owner_tx(
    tx: &Transaction<'_>,
    actor: UserId,
    owned: OwnedRef,
) -> Result<WorkspaceId, StoreError> {
    let workspace_id = authorize_member_tx(tx, actor, owned.entity())?;
    let owner = found(owner_of_tx(tx, owned)?, owned.kind())?;
    if owner != Some(actor) {
        debug!(
            actor = %actor,
            workspace_id = %workspace_id,
            entity = %owned.entity(),
            stage = "ownership",
            "denied"
        );
        return Err(StoreError::Forbidden(Denial::NotOwner {
            entity: owned.entity(),
        }));
    }
    Ok(workspace_id)
}
