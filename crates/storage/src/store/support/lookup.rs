#![forbid(unsafe_code)]

//! Point lookups by primary key, bound to the caller's transaction.

use super::super::StoreError;
use super::rows::*;
use rusqlite::{OptionalExtension, Params, Row, Transaction, params};
use tl_core::ids::{
    AttachmentId, CommentId, CustomFieldId, ProjectId, SectionId, TagId, TaskId, TeamId, UserId,
    WorkspaceId,
};
use tl_core::model::{
    Attachment, Comment, CustomField, CustomFieldOption, CustomFieldValue, Project, Section, Tag,
    Task, Team, User, Workspace,
};

pub(in crate::store) fn collect_rows<T, P: Params>(
    tx: &Transaction<'_>,
    sql: &str,
    params: P,
    map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>, StoreError> {
    let mut stmt = tx.prepare(sql)?;
    let rows = stmt.query_map(params, map)?;
    let out = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(out)
}

pub(in crate::store) fn user_tx(
    tx: &Transaction<'_>,
    user_id: UserId,
) -> Result<Option<User>, StoreError> {
    Ok(tx
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?1"),
            params![user_id.get()],
            user_row,
        )
        .optional()?)
}

pub(in crate::store) fn user_by_email_tx(
    tx: &Transaction<'_>,
    email: &str,
) -> Result<Option<User>, StoreError> {
    Ok(tx
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users u WHERE u.email = ?1"),
            params![email],
            user_row,
        )
        .optional()?)
}

pub(in crate::store) fn workspace_tx(
    tx: &Transaction<'_>,
    workspace_id: WorkspaceId,
) -> Result<Option<Workspace>, StoreError> {
    Ok(tx
        .query_row(
            &format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces w WHERE w.id = ?1"),
            params![workspace_id.get()],
            workspace_row,
        )
        .optional()?)
}

pub(in crate::store) fn team_members_tx(
    tx: &Transaction<'_>,
    team_id: TeamId,
) -> Result<Vec<User>, StoreError> {
    collect_rows(
        tx,
        &format!(
            "SELECT {USER_COLUMNS} FROM team_members m JOIN users u ON u.id = m.user_id \
             WHERE m.team_id = ?1 ORDER BY m.created_at_ms ASC, u.id ASC"
        ),
        params![team_id.get()],
        user_row,
    )
}

pub(in crate::store) fn team_tx(
    tx: &Transaction<'_>,
    team_id: TeamId,
) -> Result<Option<Team>, StoreError> {
    let team = tx
        .query_row(
            &format!("SELECT {TEAM_COLUMNS} FROM teams tm WHERE tm.id = ?1"),
            params![team_id.get()],
            team_row,
        )
        .optional()?;
    let Some(mut team) = team else {
        return Ok(None);
    };
    team.members = team_members_tx(tx, team.id)?;
    Ok(Some(team))
}

pub(in crate::store) fn project_tx(
    tx: &Transaction<'_>,
    project_id: ProjectId,
) -> Result<Option<Project>, StoreError> {
    Ok(tx
        .query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = ?1"),
            params![project_id.get()],
            project_row,
        )
        .optional()?)
}

pub(in crate::store) fn section_tx(
    tx: &Transaction<'_>,
    section_id: SectionId,
) -> Result<Option<Section>, StoreError> {
    Ok(tx
        .query_row(
            &format!("SELECT {SECTION_COLUMNS} FROM sections s WHERE s.id = ?1"),
            params![section_id.get()],
            section_row,
        )
        .optional()?)
}

pub(in crate::store) fn task_tx(
    tx: &Transaction<'_>,
    task_id: TaskId,
) -> Result<Option<Task>, StoreError> {
    Ok(tx
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks t WHERE t.id = ?1"),
            params![task_id.get()],
            task_row,
        )
        .optional()?)
}

pub(in crate::store) fn comment_tx(
    tx: &Transaction<'_>,
    comment_id: CommentId,
) -> Result<Option<Comment>, StoreError> {
    Ok(tx
        .query_row(
            &format!("SELECT {COMMENT_COLUMNS} FROM comments c WHERE c.id = ?1"),
            params![comment_id.get()],
            comment_row,
        )
        .optional()?)
}

pub(in crate::store) fn attachment_tx(
    tx: &Transaction<'_>,
    attachment_id: AttachmentId,
) -> Result<Option<Attachment>, StoreError> {
    Ok(tx
        .query_row(
            &format!("SELECT {ATTACHMENT_COLUMNS} FROM attachments a WHERE a.id = ?1"),
            params![attachment_id.get()],
            attachment_row,
        )
        .optional()?)
}

pub(in crate::store) fn tag_tx(
    tx: &Transaction<'_>,
    tag_id: TagId,
) -> Result<Option<Tag>, StoreError> {
    Ok(tx
        .query_row(
            &format!("SELECT {TAG_COLUMNS} FROM tags g WHERE g.id = ?1"),
            params![tag_id.get()],
            tag_row,
        )
        .optional()?)
}

pub(in crate::store) fn field_options_tx(
    tx: &Transaction<'_>,
    field_id: CustomFieldId,
) -> Result<Vec<CustomFieldOption>, StoreError> {
    collect_rows(
        tx,
        &format!(
            "SELECT {OPTION_COLUMNS} FROM custom_field_options o \
             WHERE o.custom_field_id = ?1 ORDER BY o.position ASC, o.id ASC"
        ),
        params![field_id.get()],
        option_row,
    )
}

/// Loads a field with its options. A stored type outside the type table is fatal.
pub(in crate::store) fn custom_field_tx(
    tx: &Transaction<'_>,
    field_id: CustomFieldId,
) -> Result<Option<CustomField>, StoreError> {
    let record = tx
        .query_row(
            &format!("SELECT {CUSTOM_FIELD_COLUMNS} FROM custom_fields f WHERE f.id = ?1"),
            params![field_id.get()],
            custom_field_row,
        )
        .optional()?;
    let Some(record) = record else {
        return Ok(None);
    };
    let options = field_options_tx(tx, record.id)?;
    record.into_field(options).map(Some)
}

pub(in crate::store) fn field_value_tx(
    tx: &Transaction<'_>,
    task_id: TaskId,
    field_id: CustomFieldId,
) -> Result<Option<CustomFieldValue>, StoreError> {
    Ok(tx
        .query_row(
            &format!(
                "SELECT {VALUE_COLUMNS} FROM custom_field_values v \
                 WHERE v.task_id = ?1 AND v.custom_field_id = ?2"
            ),
            params![task_id.get(), field_id.get()],
            value_row,
        )
        .optional()?)
}
