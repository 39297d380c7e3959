#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::{Transaction, params};
use tl_core::ids::{ProjectId, TeamId, UserId, WorkspaceId};
use tl_core::model::{NewProject, Project};
use tl_core::patch::ProjectPatch;
use tl_core::validate::{self, InputError};
use tl_core::{EntityRef, OwnedRef, Patch};
use tracing::{debug_span, info};

impl SqliteStore {
    /// The creator becomes the owner. A team, when given, must live in the same workspace.
    pub fn create_project(
        &mut self,
        actor: UserId,
        request: NewProject,
    ) -> Result<Project, StoreError> {
        let _span = debug_span!(
            "project.create",
            actor = %actor,
            workspace_id = %request.workspace_id
        )
        .entered();

        let tx = self.write_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Workspace(request.workspace_id))?;
        let name = validate::required_text("name", &request.name)?;
        if let Some(team_id) = request.team_id {
            check_team_placement_tx(&tx, team_id, request.workspace_id)?;
        }

        tx.execute(
            "INSERT INTO projects(workspace_id, team_id, owner_id, name, description, is_public, \
             created_at_ms, updated_at_ms) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                request.workspace_id.get(),
                request.team_id.map(TeamId::get),
                actor.get(),
                name,
                request.description,
                request.is_public,
                now_ms(),
            ],
        )?;
        let project_id = ProjectId::new(tx.last_insert_rowid());
        let project = found(project_tx(&tx, project_id)?, EntityKind::Project)?;

        tx.commit()?;
        Ok(project)
    }

    pub fn get_project(&self, actor: UserId, project_id: ProjectId) -> Result<Project, StoreError> {
        let _span =
            debug_span!("project.get", actor = %actor, project_id = %project_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Project(project_id))?;
        found(project_tx(&tx, project_id)?, EntityKind::Project)
    }

    pub fn list_projects(
        &self,
        actor: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Project>, StoreError> {
        let _span =
            debug_span!("project.list", actor = %actor, workspace_id = %workspace_id).entered();
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Workspace(workspace_id))?;
        collect_rows(
            &tx,
            &format!(
                "SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.workspace_id = ?1 \
                 ORDER BY p.created_at_ms ASC, p.id ASC"
            ),
            params![workspace_id.get()],
            project_row,
        )
    }

    /// Owner only. A new team is re-checked against the project's workspace.
    pub fn update_project(
        &mut self,
        actor: UserId,
        project_id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, StoreError> {
        let _span =
            debug_span!("project.update", actor = %actor, project_id = %project_id).entered();

        let tx = self.write_tx()?;
        authorize_owner_tx(&tx, actor, OwnedRef::Project(project_id))?;
        let current = found(project_tx(&tx, project_id)?, EntityKind::Project)?;
        if patch.is_empty() {
            return Err(InputError::EmptyPatch.into());
        }
        let patch = ProjectPatch {
            name: patch
                .name
                .as_deref()
                .map(|name| validate::required_text("name", name))
                .transpose()?,
            ..patch
        };
        if let Some(Some(team_id)) = patch.team_id {
            check_team_placement_tx(&tx, team_id, current.workspace_id)?;
        }

        let next = patch.apply(&current, now_ms());
        tx.execute(
            "UPDATE projects SET team_id = ?2, name = ?3, description = ?4, is_public = ?5, \
             updated_at_ms = ?6 WHERE id = ?1",
            params![
                next.id.get(),
                next.team_id.map(TeamId::get),
                next.name,
                next.description,
                next.is_public,
                next.updated_at_ms,
            ],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Owner only. Sections, tasks and custom fields go with the project.
    pub fn delete_project(
        &mut self,
        actor: UserId,
        project_id: ProjectId,
    ) -> Result<(), StoreError> {
        let _span =
            debug_span!("project.delete", actor = %actor, project_id = %project_id).entered();

        let tx = self.write_tx()?;
        authorize_owner_tx(&tx, actor, OwnedRef::Project(project_id))?;
        tx.execute("DELETE FROM projects WHERE id = ?1", params![project_id.get()])?;

        tx.commit()?;
        info!(actor = %actor, project_id = %project_id, "project deleted");
        Ok(())
    }
}

fn check_team_placement_tx(
    tx: &Transaction<'_>,
    team_id: TeamId,
    workspace_id: WorkspaceId,
) -> Result<(), StoreError> {
    let team = found(team_tx(tx, team_id)?, EntityKind::Team)?;
    validate::team_placement(team.workspace_id, workspace_id)?;
    Ok(())
}
