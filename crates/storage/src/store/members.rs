#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::params;
use tl_core::ids::{UserId, WorkspaceId};
use tl_core::model::User;
use tl_core::validate;
use tl_core::{EntityRef, OwnedRef};
use tracing::{debug, debug_span, info};

impl SqliteStore {
    /// Owner only. Adding an existing member is a no-op.
    pub fn add_workspace_member(
        &mut self,
        actor: UserId,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> Result<(), StoreError> {
        let _span = debug_span!(
            "workspace.member.add",
            actor = %actor,
            workspace_id = %workspace_id,
            user_id = %user_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_owner_tx(&tx, actor, OwnedRef::Workspace(workspace_id))?;
        found(user_tx(&tx, user_id)?, EntityKind::User)?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO workspace_members(workspace_id, user_id, created_at_ms) \
             VALUES (?1, ?2, ?3)",
            params![workspace_id.get(), user_id.get(), now_ms()],
        )?;

        tx.commit()?;
        if inserted > 0 {
            info!(actor = %actor, workspace_id = %workspace_id, user_id = %user_id, "member added");
        }
        Ok(())
    }

    /// The owner may remove anyone but themself; any member may leave.
    ///
    /// The user's team memberships inside the workspace go with the membership.
    pub fn remove_workspace_member(
        &mut self,
        actor: UserId,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> Result<(), StoreError> {
        let _span = debug_span!(
            "workspace.member.remove",
            actor = %actor,
            workspace_id = %workspace_id,
            user_id = %user_id
        )
        .entered();

        let tx = self.write_tx()?;
        let workspace = found(workspace_tx(&tx, workspace_id)?, EntityKind::Workspace)?;
        ensure_member_tx(&tx, actor, workspace_id)?;
        if actor != user_id && workspace.owner_id != actor {
            debug!(actor = %actor, workspace_id = %workspace_id, stage = "ownership", "denied");
            return Err(StoreError::Forbidden(Denial::NotOwner {
                entity: EntityRef::Workspace(workspace_id),
            }));
        }
        validate::membership_removal(&workspace, user_id)?;

        let removed = tx.execute(
            "DELETE FROM workspace_members WHERE workspace_id = ?1 AND user_id = ?2",
            params![workspace_id.get(), user_id.get()],
        )?;
        if removed == 0 {
            return Err(StoreError::NotFound(EntityKind::Membership));
        }
        tx.execute(
            "DELETE FROM team_members \
             WHERE user_id = ?1 AND team_id IN (SELECT id FROM teams WHERE workspace_id = ?2)",
            params![user_id.get(), workspace_id.get()],
        )?;

        tx.commit()?;
        info!(actor = %actor, workspace_id = %workspace_id, user_id = %user_id, "member removed");
        Ok(())
    }

    pub fn list_workspace_members(
        &self,
        actor: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<User>, StoreError> {
        let _span = debug_span!(
            "workspace.member.list",
            actor = %actor,
            workspace_id = %workspace_id
        )
        .entered();

        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Workspace(workspace_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {USER_COLUMNS} FROM workspace_members m \
                 JOIN users u ON u.id = m.user_id \
                 WHERE m.workspace_id = ?1 \
                 ORDER BY m.created_at_ms ASC, u.id ASC"
            ),
            params![workspace_id.get()],
            user_row,
        )
    }
}
