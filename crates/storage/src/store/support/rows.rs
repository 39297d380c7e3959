#![forbid(unsafe_code)]

//! Column lists and row mappers. Each list is written against a fixed table alias so joins can
//! reuse it verbatim.

use super::super::StoreError;
use rusqlite::Row;
use rusqlite::types::Type;
use tl_core::ids::{
    AttachmentId, CommentId, CustomFieldId, CustomFieldOptionId, CustomFieldValueId, ProjectId,
    SectionId, TagId, TaskId, TeamId, UserId, WorkspaceId,
};
use tl_core::model::{
    Attachment, Comment, CustomField, CustomFieldOption, CustomFieldValue, FieldType, FieldValue,
    Project, Section, Tag, Task, Team, User, Workspace,
};
use tl_core::validate;

pub(in crate::store) const USER_COLUMNS: &str =
    "u.id, u.email, u.name, u.created_at_ms, u.updated_at_ms";

pub(in crate::store) const WORKSPACE_COLUMNS: &str =
    "w.id, w.name, w.owner_id, w.created_at_ms, w.updated_at_ms";

pub(in crate::store) const TEAM_COLUMNS: &str = "tm.id, tm.workspace_id, tm.name, tm.created_at_ms";

pub(in crate::store) const PROJECT_COLUMNS: &str = "p.id, p.workspace_id, p.team_id, p.owner_id, \
     p.name, p.description, p.is_public, p.created_at_ms, p.updated_at_ms";

pub(in crate::store) const SECTION_COLUMNS: &str =
    "s.id, s.project_id, s.name, s.position, s.created_at_ms";

pub(in crate::store) const TASK_COLUMNS: &str = "t.id, t.project_id, t.section_id, \
     t.parent_task_id, t.assignee_id, t.creator_id, t.name, t.description, t.due_at_ms, \
     t.completed_at_ms, t.position, t.created_at_ms, t.updated_at_ms";

pub(in crate::store) const COMMENT_COLUMNS: &str =
    "c.id, c.task_id, c.author_id, c.content, c.created_at_ms, c.updated_at_ms";

pub(in crate::store) const ATTACHMENT_COLUMNS: &str =
    "a.id, a.task_id, a.comment_id, a.uploader_id, a.filename, a.url, a.created_at_ms";

pub(in crate::store) const TAG_COLUMNS: &str =
    "g.id, g.workspace_id, g.name, g.color, g.created_at_ms";

pub(in crate::store) const CUSTOM_FIELD_COLUMNS: &str =
    "f.id, f.project_id, f.name, f.field_type, f.created_at_ms";

pub(in crate::store) const OPTION_COLUMNS: &str = "o.id, o.value, o.color, o.position";

pub(in crate::store) const VALUE_COLUMNS: &str = "v.id, v.task_id, v.custom_field_id, \
     v.value_text, v.value_number, v.value_date, v.value_boolean, v.created_at_ms, v.updated_at_ms";

pub(in crate::store) fn user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId::new(row.get(0)?),
        email: row.get(1)?,
        name: row.get(2)?,
        created_at_ms: row.get(3)?,
        updated_at_ms: row.get(4)?,
    })
}

pub(in crate::store) fn workspace_row(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    Ok(Workspace {
        id: WorkspaceId::new(row.get(0)?),
        name: row.get(1)?,
        owner_id: UserId::new(row.get(2)?),
        created_at_ms: row.get(3)?,
        updated_at_ms: row.get(4)?,
    })
}

/// Members are loaded separately; see `team_tx`.
pub(in crate::store) fn team_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: TeamId::new(row.get(0)?),
        workspace_id: WorkspaceId::new(row.get(1)?),
        name: row.get(2)?,
        created_at_ms: row.get(3)?,
        members: Vec::new(),
    })
}

pub(in crate::store) fn project_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: ProjectId::new(row.get(0)?),
        workspace_id: WorkspaceId::new(row.get(1)?),
        team_id: row.get::<_, Option<i64>>(2)?.map(TeamId::new),
        owner_id: row.get::<_, Option<i64>>(3)?.map(UserId::new),
        name: row.get(4)?,
        description: row.get(5)?,
        is_public: row.get(6)?,
        created_at_ms: row.get(7)?,
        updated_at_ms: row.get(8)?,
    })
}

pub(in crate::store) fn section_row(row: &Row<'_>) -> rusqlite::Result<Section> {
    Ok(Section {
        id: SectionId::new(row.get(0)?),
        project_id: ProjectId::new(row.get(1)?),
        name: row.get(2)?,
        position: row.get(3)?,
        created_at_ms: row.get(4)?,
    })
}

pub(in crate::store) fn task_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: TaskId::new(row.get(0)?),
        project_id: ProjectId::new(row.get(1)?),
        section_id: row.get::<_, Option<i64>>(2)?.map(SectionId::new),
        parent_task_id: row.get::<_, Option<i64>>(3)?.map(TaskId::new),
        assignee_id: row.get::<_, Option<i64>>(4)?.map(UserId::new),
        creator_id: UserId::new(row.get(5)?),
        name: row.get(6)?,
        description: row.get(7)?,
        due_at_ms: row.get(8)?,
        completed_at_ms: row.get(9)?,
        position: row.get(10)?,
        created_at_ms: row.get(11)?,
        updated_at_ms: row.get(12)?,
    })
}

pub(in crate::store) fn comment_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: CommentId::new(row.get(0)?),
        task_id: TaskId::new(row.get(1)?),
        author_id: UserId::new(row.get(2)?),
        content: row.get(3)?,
        created_at_ms: row.get(4)?,
        updated_at_ms: row.get(5)?,
    })
}

pub(in crate::store) fn attachment_row(row: &Row<'_>) -> rusqlite::Result<Attachment> {
    let task_id = row.get::<_, Option<i64>>(1)?.map(TaskId::new);
    let comment_id = row.get::<_, Option<i64>>(2)?.map(CommentId::new);
    let target = validate::attachment_target(task_id, comment_id).map_err(|violation| {
        rusqlite::Error::FromSqlConversionFailure(1, Type::Null, Box::new(violation))
    })?;
    Ok(Attachment {
        id: AttachmentId::new(row.get(0)?),
        target,
        uploader_id: row.get::<_, Option<i64>>(3)?.map(UserId::new),
        filename: row.get(4)?,
        url: row.get(5)?,
        created_at_ms: row.get(6)?,
    })
}

pub(in crate::store) fn tag_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: TagId::new(row.get(0)?),
        workspace_id: WorkspaceId::new(row.get(1)?),
        name: row.get(2)?,
        color: row.get(3)?,
        created_at_ms: row.get(4)?,
    })
}

/// A custom field as stored, before its type is checked against the type table.
pub(in crate::store) struct CustomFieldRecord {
    pub(in crate::store) id: CustomFieldId,
    pub(in crate::store) project_id: ProjectId,
    pub(in crate::store) name: String,
    pub(in crate::store) field_type: String,
    pub(in crate::store) created_at_ms: i64,
}

impl CustomFieldRecord {
    pub(in crate::store) fn into_field(
        self,
        options: Vec<CustomFieldOption>,
    ) -> Result<CustomField, StoreError> {
        let Some(field_type) = FieldType::parse(&self.field_type) else {
            return Err(StoreError::UnmappedFieldType(self.field_type));
        };
        Ok(CustomField {
            id: self.id,
            project_id: self.project_id,
            name: self.name,
            field_type,
            created_at_ms: self.created_at_ms,
            options,
        })
    }
}

pub(in crate::store) fn custom_field_row(row: &Row<'_>) -> rusqlite::Result<CustomFieldRecord> {
    Ok(CustomFieldRecord {
        id: CustomFieldId::new(row.get(0)?),
        project_id: ProjectId::new(row.get(1)?),
        name: row.get(2)?,
        field_type: row.get(3)?,
        created_at_ms: row.get(4)?,
    })
}

pub(in crate::store) fn option_row(row: &Row<'_>) -> rusqlite::Result<CustomFieldOption> {
    Ok(CustomFieldOption {
        id: CustomFieldOptionId::new(row.get(0)?),
        value: row.get(1)?,
        color: row.get(2)?,
        position: row.get(3)?,
    })
}

pub(in crate::store) fn value_row(row: &Row<'_>) -> rusqlite::Result<CustomFieldValue> {
    let value = if let Some(text) = row.get::<_, Option<String>>(3)? {
        FieldValue::Text(text)
    } else if let Some(number) = row.get::<_, Option<f64>>(4)? {
        FieldValue::Number(number)
    } else if let Some(date) = row.get::<_, Option<i64>>(5)? {
        FieldValue::Date(date)
    } else if let Some(flag) = row.get::<_, Option<bool>>(6)? {
        FieldValue::Boolean(flag)
    } else {
        return Err(rusqlite::Error::InvalidColumnType(
            3,
            "value_text".to_string(),
            Type::Null,
        ));
    };
    Ok(CustomFieldValue {
        id: CustomFieldValueId::new(row.get(0)?),
        task_id: TaskId::new(row.get(1)?),
        custom_field_id: CustomFieldId::new(row.get(2)?),
        value,
        created_at_ms: row.get(7)?,
        updated_at_ms: row.get(8)?,
    })
}
