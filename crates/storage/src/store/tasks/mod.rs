#![forbid(unsafe_code)]

mod create;
mod get;
mod list;
mod update;

use super::support::*;
use super::*;
use rusqlite::Transaction;
use tl_core::ids::{ProjectId, SectionId, TaskId, UserId, WorkspaceId};
use tl_core::validate::{self, MemberRole};

fn check_section_tx(
    tx: &Transaction<'_>,
    section_id: SectionId,
    project_id: ProjectId,
) -> Result<(), StoreError> {
    let section = found(section_tx(tx, section_id)?, EntityKind::Section)?;
    validate::section_placement(&section, project_id)?;
    Ok(())
}

fn check_parent_tx(
    tx: &Transaction<'_>,
    parent_task_id: TaskId,
    project_id: ProjectId,
) -> Result<(), StoreError> {
    let parent = found(task_tx(tx, parent_task_id)?, EntityKind::Task)?;
    validate::parent_placement(&parent, project_id)?;
    Ok(())
}

fn check_assignee_tx(
    tx: &Transaction<'_>,
    assignee_id: UserId,
    workspace_id: WorkspaceId,
) -> Result<(), StoreError> {
    validate::workspace_member(
        assignee_id,
        MemberRole::Assignee,
        is_member_tx(tx, assignee_id, workspace_id)?,
    )?;
    Ok(())
}
