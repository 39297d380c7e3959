#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::params;
use tl_core::ids::{TeamId, UserId, WorkspaceId};
use tl_core::model::{NewTeam, Team};
use tl_core::patch::TeamPatch;
use tl_core::validate::{self, InputError, MemberRole};
use tl_core::{EntityRef, Patch};
use tracing::{debug_span, info};

impl SqliteStore {
    /// The creator joins the new team in the same transaction.
    pub fn create_team(&mut self, actor: UserId, request: NewTeam) -> Result<Team, StoreError> {
        let _span = debug_span!(
            "team.create",
            actor = %actor,
            workspace_id = %request.workspace_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Workspace(request.workspace_id))?;
        let name = validate::required_text("name", &request.name)?;

        let now_ms = now_ms();
        tx.execute(
            "INSERT INTO teams(workspace_id, name, created_at_ms) VALUES (?1, ?2, ?3)",
            params![request.workspace_id.get(), name, now_ms],
        )?;
        let team_id = TeamId::new(tx.last_insert_rowid());
        tx.execute(
            "INSERT INTO team_members(team_id, user_id, created_at_ms) VALUES (?1, ?2, ?3)",
            params![team_id.get(), actor.get(), now_ms],
        )?;
        let team = found(team_tx(&tx, team_id)?, EntityKind::Team)?;

        tx.commit()?;
        Ok(team)
    }

    pub fn get_team(&self, actor: UserId, team_id: TeamId) -> Result<Team, StoreError> {
        let _span = debug_span!("team.get", actor = %actor, team_id = %team_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Team(team_id))?;
        found(team_tx(&tx, team_id)?, EntityKind::Team)
    }

    pub fn list_teams(
        &self,
        actor: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Team>, StoreError> {
        let _span =
            debug_span!("team.list", actor = %actor, workspace_id = %workspace_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Workspace(workspace_id))?;

        let mut teams = collect_rows(
            &tx,
            &format!(
                "SELECT {TEAM_COLUMNS} FROM teams tm WHERE tm.workspace_id = ?1 \
                 ORDER BY tm.created_at_ms ASC, tm.id ASC"
            ),
            params![workspace_id.get()],
            team_row,
        )?;
        for team in &mut teams {
            team.members = team_members_tx(&tx, team.id)?;
        }
        Ok(teams)
    }

    pub fn update_team(
        &mut self,
        actor: UserId,
        team_id: TeamId,
        patch: TeamPatch,
    ) -> Result<Team, StoreError> {
        let _span = debug_span!("team.update", actor = %actor, team_id = %team_id).entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Team(team_id))?;
        let current = found(team_tx(&tx, team_id)?, EntityKind::Team)?;
        if patch.is_empty() {
            return Err(InputError::EmptyPatch.into());
        }
        let patch = TeamPatch {
            name: patch
                .name
                .as_deref()
                .map(|name| validate::required_text("name", name))
                .transpose()?,
        };

        let next = patch.apply(&current, now_ms());
        tx.execute(
            "UPDATE teams SET name = ?2 WHERE id = ?1",
            params![next.id.get(), next.name],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Projects of the team stay, with `team_id` cleared.
    pub fn delete_team(&mut self, actor: UserId, team_id: TeamId) -> Result<(), StoreError> {
        let _span = debug_span!("team.delete", actor = %actor, team_id = %team_id).entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Team(team_id))?;
        tx.execute("DELETE FROM teams WHERE id = ?1", params![team_id.get()])?;

        tx.commit()?;
        info!(actor = %actor, team_id = %team_id, "team deleted");
        Ok(())
    }

    /// Idempotent. The user must already belong to the team's workspace.
    pub fn add_team_member(
        &mut self,
        actor: UserId,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<Team, StoreError> {
        let _span = debug_span!(
            "team.member.add",
            actor = %actor,
            team_id = %team_id,
            user_id = %user_id
        )
        .entered();

        let tx = self.write_tx()?;
        let workspace_id = authorize_member_tx(&tx, actor, EntityRef::Team(team_id))?;
        found(user_tx(&tx, user_id)?, EntityKind::User)?;
        validate::workspace_member(
            user_id,
            MemberRole::TeamMember,
            is_member_tx(&tx, user_id, workspace_id)?,
        )?;

        tx.execute(
            "INSERT OR IGNORE INTO team_members(team_id, user_id, created_at_ms) \
             VALUES (?1, ?2, ?3)",
            params![team_id.get(), user_id.get(), now_ms()],
        )?;
        let team = found(team_tx(&tx, team_id)?, EntityKind::Team)?;

        tx.commit()?;
        Ok(team)
    }

    pub fn remove_team_member(
        &mut self,
        actor: UserId,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<Team, StoreError> {
        let _span = debug_span!(
            "team.member.remove",
            actor = %actor,
            team_id = %team_id,
            user_id = %user_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Team(team_id))?;
        let removed = tx.execute(
            "DELETE FROM team_members WHERE team_id = ?1 AND user_id = ?2",
            params![team_id.get(), user_id.get()],
        )?;
        if removed == 0 {
            return Err(StoreError::NotFound(EntityKind::TeamMembership));
        }
        let team = found(team_tx(&tx, team_id)?, EntityKind::Team)?;

        tx.commit()?;
        info!(actor = %actor, team_id = %team_id, user_id = %user_id, "team member removed");
        Ok(team)
    }
}
