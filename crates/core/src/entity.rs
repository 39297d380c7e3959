#![forbid(unsafe_code)]

//! Entity references used by the authority to walk ownership chains.

use crate::ids::{
    AttachmentId, CommentId, CustomFieldId, ProjectId, SectionId, TagId, TaskId, TeamId,
    WorkspaceId,
};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Workspace,
    Membership,
    Team,
    TeamMembership,
    Project,
    Section,
    Task,
    Comment,
    Attachment,
    Tag,
    TaskTag,
    CustomField,
    CustomFieldValue,
    TaskFollower,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Workspace => "workspace",
            Self::Membership => "workspace membership",
            Self::Team => "team",
            Self::TeamMembership => "team membership",
            Self::Project => "project",
            Self::Section => "section",
            Self::Task => "task",
            Self::Comment => "comment",
            Self::Attachment => "attachment",
            Self::Tag => "tag",
            Self::TaskTag => "task tag",
            Self::CustomField => "custom field",
            Self::CustomFieldValue => "custom field value",
            Self::TaskFollower => "task follower",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any entity whose workspace can be derived by following foreign keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Workspace(WorkspaceId),
    Team(TeamId),
    Project(ProjectId),
    Section(SectionId),
    Task(TaskId),
    Comment(CommentId),
    Attachment(AttachmentId),
    Tag(TagId),
    CustomField(CustomFieldId),
}

impl EntityRef {
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Workspace(_) => EntityKind::Workspace,
            Self::Team(_) => EntityKind::Team,
            Self::Project(_) => EntityKind::Project,
            Self::Section(_) => EntityKind::Section,
            Self::Task(_) => EntityKind::Task,
            Self::Comment(_) => EntityKind::Comment,
            Self::Attachment(_) => EntityKind::Attachment,
            Self::Tag(_) => EntityKind::Tag,
            Self::CustomField(_) => EntityKind::CustomField,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Self::Workspace(id) => id.get(),
            Self::Team(id) => id.get(),
            Self::Project(id) => id.get(),
            Self::Section(id) => id.get(),
            Self::Task(id) => id.get(),
            Self::Comment(id) => id.get(),
            Self::Attachment(id) => id.get(),
            Self::Tag(id) => id.get(),
            Self::CustomField(id) => id.get(),
        };
        write!(f, "{}#{id}", self.kind())
    }
}

/// Entities that carry an owner, author or uploader stronger than membership.
///
/// Custom fields have no owner column; their owner is the owner of the project they belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OwnedRef {
    Workspace(WorkspaceId),
    Project(ProjectId),
    Comment(CommentId),
    Attachment(AttachmentId),
    CustomField(CustomFieldId),
}

impl OwnedRef {
    pub fn kind(self) -> EntityKind {
        self.entity().kind()
    }

    pub fn entity(self) -> EntityRef {
        match self {
            Self::Workspace(id) => EntityRef::Workspace(id),
            Self::Project(id) => EntityRef::Project(id),
            Self::Comment(id) => EntityRef::Comment(id),
            Self::Attachment(id) => EntityRef::Attachment(id),
            Self::CustomField(id) => EntityRef::CustomField(id),
        }
    }
}
