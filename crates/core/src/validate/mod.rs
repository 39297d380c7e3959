#![forbid(unsafe_code)]

//! Write-time invariant checks.
//!
//! Every function here is pure: callers load the facts inside their transaction and pass them in.
//! Nothing is mutated; the result is either acceptance or the first violated rule.

mod input;

pub use input::*;

use crate::ids::{CommentId, ProjectId, TaskId, UserId, WorkspaceId};
use crate::model::{
    AttachmentTarget, CustomField, CustomFieldValuePayload, FieldType, FieldValue,
    NewFieldOption, Section, Tag, Task, ValueSlot, Workspace,
};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.message())]
pub enum Violation {
    TagWorkspaceMismatch {
        tag_workspace: WorkspaceId,
        task_workspace: WorkspaceId,
    },
    CustomFieldProjectMismatch {
        field_project: ProjectId,
        task_project: ProjectId,
    },
    CustomFieldTypeMismatch {
        field_type: FieldType,
        expected: ValueSlot,
        provided: Vec<ValueSlot>,
    },
    DropdownValueUnknown {
        value: String,
    },
    AttachmentTargetMissing,
    AttachmentTargetAmbiguous,
    SectionProjectMismatch {
        section_project: ProjectId,
        task_project: ProjectId,
    },
    ParentTaskProjectMismatch {
        parent_project: ProjectId,
        task_project: ProjectId,
    },
    TeamWorkspaceMismatch {
        team_workspace: WorkspaceId,
        project_workspace: WorkspaceId,
    },
    NotAWorkspaceMember {
        user_id: UserId,
        role: MemberRole,
    },
    OptionsOnNonDropdown {
        field_type: FieldType,
    },
    DuplicateOption {
        value: String,
    },
    NumberNotFinite,
    OwnerMembershipRequired,
}

/// Why a user is being attached to something inside a workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberRole {
    Assignee,
    Follower,
    TeamMember,
}

impl Violation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::TagWorkspaceMismatch { .. } => "tag and task must belong to the same workspace",
            Self::CustomFieldProjectMismatch { .. } => {
                "custom field does not belong to the task's project"
            }
            Self::CustomFieldTypeMismatch { .. } => "value does not match the field type",
            Self::DropdownValueUnknown { .. } => "dropdown value is not one of the field options",
            Self::AttachmentTargetMissing => "attachment needs a task or a comment",
            Self::AttachmentTargetAmbiguous => {
                "attachment must belong to a task or a comment, not both"
            }
            Self::SectionProjectMismatch { .. } => "section belongs to another project",
            Self::ParentTaskProjectMismatch { .. } => "parent task belongs to another project",
            Self::TeamWorkspaceMismatch { .. } => "team belongs to another workspace",
            Self::NotAWorkspaceMember { .. } => "user is not a member of the workspace",
            Self::OptionsOnNonDropdown { .. } => "only dropdown fields accept options",
            Self::DuplicateOption { .. } => "dropdown options must be unique",
            Self::NumberNotFinite => "number values must be finite",
            Self::OwnerMembershipRequired => "the workspace owner must remain a member",
        }
    }
}

pub fn tag_assignment(tag: &Tag, task_workspace: WorkspaceId) -> Result<(), Violation> {
    if tag.workspace_id != task_workspace {
        return Err(Violation::TagWorkspaceMismatch {
            tag_workspace: tag.workspace_id,
            task_workspace,
        });
    }
    Ok(())
}

pub fn field_placement(field: &CustomField, task_project: ProjectId) -> Result<(), Violation> {
    if field.project_id != task_project {
        return Err(Violation::CustomFieldProjectMismatch {
            field_project: field.project_id,
            task_project,
        });
    }
    Ok(())
}

/// Checks a value payload against its field and returns the single typed value to store.
pub fn custom_field_value(
    field: &CustomField,
    task: &Task,
    payload: &CustomFieldValuePayload,
) -> Result<FieldValue, Violation> {
    field_placement(field, task.project_id)?;

    let expected = field.field_type.value_slot();
    let provided = payload.populated_slots();
    let value = match payload.slot_value(expected) {
        Some(value) if provided.len() == 1 => value,
        _ => {
            return Err(Violation::CustomFieldTypeMismatch {
                field_type: field.field_type,
                expected,
                provided,
            });
        }
    };

    if let FieldValue::Number(number) = &value
        && !number.is_finite()
    {
        return Err(Violation::NumberNotFinite);
    }
    if field.field_type == FieldType::Dropdown
        && let FieldValue::Text(text) = &value
        && !field.has_option(text)
    {
        return Err(Violation::DropdownValueUnknown {
            value: text.clone(),
        });
    }

    Ok(value)
}

pub fn attachment_target(
    task_id: Option<TaskId>,
    comment_id: Option<CommentId>,
) -> Result<AttachmentTarget, Violation> {
    match (task_id, comment_id) {
        (Some(task_id), None) => Ok(AttachmentTarget::Task(task_id)),
        (None, Some(comment_id)) => Ok(AttachmentTarget::Comment(comment_id)),
        (Some(_), Some(_)) => Err(Violation::AttachmentTargetAmbiguous),
        (None, None) => Err(Violation::AttachmentTargetMissing),
    }
}

pub fn section_placement(section: &Section, task_project: ProjectId) -> Result<(), Violation> {
    if section.project_id != task_project {
        return Err(Violation::SectionProjectMismatch {
            section_project: section.project_id,
            task_project,
        });
    }
    Ok(())
}

pub fn parent_placement(parent: &Task, task_project: ProjectId) -> Result<(), Violation> {
    if parent.project_id != task_project {
        return Err(Violation::ParentTaskProjectMismatch {
            parent_project: parent.project_id,
            task_project,
        });
    }
    Ok(())
}

pub fn team_placement(
    team_workspace: WorkspaceId,
    project_workspace: WorkspaceId,
) -> Result<(), Violation> {
    if team_workspace != project_workspace {
        return Err(Violation::TeamWorkspaceMismatch {
            team_workspace,
            project_workspace,
        });
    }
    Ok(())
}

/// Assignees, followers and team members must already be members of the workspace.
pub fn workspace_member(
    user_id: UserId,
    role: MemberRole,
    is_member: bool,
) -> Result<(), Violation> {
    if !is_member {
        return Err(Violation::NotAWorkspaceMember { user_id, role });
    }
    Ok(())
}

pub fn custom_field_definition(
    field_type: FieldType,
    options: &[NewFieldOption],
) -> Result<(), Violation> {
    if field_type != FieldType::Dropdown && !options.is_empty() {
        return Err(Violation::OptionsOnNonDropdown { field_type });
    }
    // Options are stored trimmed, so compare them that way.
    let mut seen = BTreeSet::new();
    for option in options {
        let value = option.value.trim();
        if !seen.insert(value) {
            return Err(Violation::DuplicateOption {
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

pub fn membership_removal(workspace: &Workspace, user_id: UserId) -> Result<(), Violation> {
    if workspace.owner_id == user_id {
        return Err(Violation::OwnerMembershipRequired);
    }
    Ok(())
}
