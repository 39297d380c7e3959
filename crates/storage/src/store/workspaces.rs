#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::params;
use tl_core::ids::{UserId, WorkspaceId};
use tl_core::model::{NewWorkspace, Workspace};
use tl_core::patch::WorkspacePatch;
use tl_core::validate::{self, InputError};
use tl_core::{EntityRef, OwnedRef, Patch};
use tracing::{debug_span, info};

impl SqliteStore {
    /// The creator becomes owner and, in the same transaction, a member.
    pub fn create_workspace(
        &mut self,
        actor: UserId,
        request: NewWorkspace,
    ) -> Result<Workspace, StoreError> {
        let _span = debug_span!("workspace.create", actor = %actor).entered();
        let name = validate::required_text("name", &request.name)?;

        let tx = self.write_tx()?;
        found(user_tx(&tx, actor)?, EntityKind::User)?;

        let now_ms = now_ms();
        tx.execute(
            "INSERT INTO workspaces(name, owner_id, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?3)",
            params![name, actor.get(), now_ms],
        )?;
        let workspace_id = WorkspaceId::new(tx.last_insert_rowid());
        tx.execute(
            "INSERT INTO workspace_members(workspace_id, user_id, created_at_ms) \
             VALUES (?1, ?2, ?3)",
            params![workspace_id.get(), actor.get(), now_ms],
        )?;
        let workspace = found(workspace_tx(&tx, workspace_id)?, EntityKind::Workspace)?;

        tx.commit()?;
        info!(actor = %actor, workspace_id = %workspace.id, "workspace created");
        Ok(workspace)
    }

    pub fn get_workspace(
        &self,
        actor: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<Workspace, StoreError> {
        let _span =
            debug_span!("workspace.get", actor = %actor, workspace_id = %workspace_id).entered();
        let tx = self.read_tx()?;
        let workspace = found(workspace_tx(&tx, workspace_id)?, EntityKind::Workspace)?;
        ensure_member_tx(&tx, actor, workspace.id)?;
        Ok(workspace)
    }

    /// Only workspaces the actor is a member of.
    pub fn list_workspaces(&self, actor: UserId) -> Result<Vec<Workspace>, StoreError> {
        let _span = debug_span!("workspace.list", actor = %actor).entered();
        let tx = self.read_tx()?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {WORKSPACE_COLUMNS} FROM workspaces w \
                 JOIN workspace_members m ON m.workspace_id = w.id \
                 WHERE m.user_id = ?1 \
                 ORDER BY w.created_at_ms ASC, w.id ASC"
            ),
            params![actor.get()],
            workspace_row,
        )
    }

    pub fn update_workspace(
        &mut self,
        actor: UserId,
        workspace_id: WorkspaceId,
        patch: WorkspacePatch,
    ) -> Result<Workspace, StoreError> {
        let _span =
            debug_span!("workspace.update", actor = %actor, workspace_id = %workspace_id).entered();

        let tx = self.write_tx()?;
        authorize_owner_tx(&tx, actor, OwnedRef::Workspace(workspace_id))?;
        let current = found(workspace_tx(&tx, workspace_id)?, EntityKind::Workspace)?;
        if patch.is_empty() {
            return Err(InputError::EmptyPatch.into());
        }
        let patch = WorkspacePatch {
            name: patch
                .name
                .as_deref()
                .map(|name| validate::required_text("name", name))
                .transpose()?,
        };

        let next = patch.apply(&current, now_ms());
        tx.execute(
            "UPDATE workspaces SET name = ?2, updated_at_ms = ?3 WHERE id = ?1",
            params![next.id.get(), next.name, next.updated_at_ms],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Cascades to memberships, teams, projects (and everything under them) and tags.
    pub fn delete_workspace(
        &mut self,
        actor: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<(), StoreError> {
        let _span =
            debug_span!("workspace.delete", actor = %actor, workspace_id = %workspace_id).entered();

        let tx = self.write_tx()?;
        authorize_owner_tx(&tx, actor, OwnedRef::Workspace(workspace_id))?;
        tx.execute(
            "DELETE FROM workspaces WHERE id = ?1",
            params![workspace_id.get()],
        )
        .map_err(|err| map_write_conflict(err, "workspace still referenced"))?;

        tx.commit()?;
        info!(
            actor = %actor,
            entity = %EntityRef::Workspace(workspace_id),
            "workspace deleted"
        );
        Ok(())
    }
}
