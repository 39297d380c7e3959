#![forbid(unsafe_code)]

//! Partial updates.
//!
//! Nullable columns use `Option<Option<T>>`: `None` leaves the field alone, `Some(None)` clears it,
//! `Some(Some(v))` sets it. Non-nullable columns use a plain `Option<T>`.

use crate::ids::{SectionId, TeamId, UserId};
use crate::model::{
    Comment, CustomField, Project, Section, Tag, Task, Team, User, Workspace,
    completion_timestamp,
};
use serde::Deserialize;

/// A typed, field-by-field merge onto the current state of an entity.
pub trait Patch<T> {
    fn is_empty(&self) -> bool;

    /// Returns the proposed state. `current` is not modified.
    fn apply(&self, current: &T, now_ms: i64) -> T;
}

/// `#[serde(deserialize_with)]` helper: a present key (even `null`) becomes `Some(_)`.
///
/// Pair it with `#[serde(default)]` so a missing key stays `None`.
pub mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

fn merge<T: Clone>(patch: &Option<T>, current: &T) -> T {
    patch.clone().unwrap_or_else(|| current.clone())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
}

impl Patch<User> for UserPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    fn apply(&self, current: &User, now_ms: i64) -> User {
        User {
            name: merge(&self.name, &current.name),
            updated_at_ms: now_ms,
            ..current.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct WorkspacePatch {
    #[serde(default)]
    pub name: Option<String>,
}

impl Patch<Workspace> for WorkspacePatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    fn apply(&self, current: &Workspace, now_ms: i64) -> Workspace {
        Workspace {
            name: merge(&self.name, &current.name),
            updated_at_ms: now_ms,
            ..current.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TeamPatch {
    #[serde(default)]
    pub name: Option<String>,
}

impl Patch<Team> for TeamPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    fn apply(&self, current: &Team, _now_ms: i64) -> Team {
        Team {
            name: merge(&self.name, &current.name),
            ..current.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub team_id: Option<Option<TeamId>>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl Patch<Project> for ProjectPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.team_id.is_none()
            && self.is_public.is_none()
    }

    fn apply(&self, current: &Project, now_ms: i64) -> Project {
        Project {
            name: merge(&self.name, &current.name),
            description: merge(&self.description, &current.description),
            team_id: merge(&self.team_id, &current.team_id),
            is_public: merge(&self.is_public, &current.is_public),
            updated_at_ms: now_ms,
            ..current.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SectionPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
}

impl Patch<Section> for SectionPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.position.is_none()
    }

    fn apply(&self, current: &Section, _now_ms: i64) -> Section {
        Section {
            name: merge(&self.name, &current.name),
            position: merge(&self.position, &current.position),
            ..current.clone()
        }
    }
}

/// `completed` is write-only: it is translated onto `completed_at_ms` and never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub section_id: Option<Option<SectionId>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub assignee_id: Option<Option<UserId>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub due_at_ms: Option<Option<i64>>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub position: Option<i64>,
}

impl Patch<Task> for TaskPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.section_id.is_none()
            && self.assignee_id.is_none()
            && self.due_at_ms.is_none()
            && self.completed.is_none()
            && self.position.is_none()
    }

    fn apply(&self, current: &Task, now_ms: i64) -> Task {
        Task {
            name: merge(&self.name, &current.name),
            description: merge(&self.description, &current.description),
            section_id: merge(&self.section_id, &current.section_id),
            assignee_id: merge(&self.assignee_id, &current.assignee_id),
            due_at_ms: merge(&self.due_at_ms, &current.due_at_ms),
            completed_at_ms: completion_timestamp(self.completed, current.completed_at_ms, now_ms),
            position: merge(&self.position, &current.position),
            updated_at_ms: now_ms,
            ..current.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CommentPatch {
    #[serde(default, alias = "text")]
    pub content: Option<String>,
}

impl Patch<Comment> for CommentPatch {
    fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    fn apply(&self, current: &Comment, now_ms: i64) -> Comment {
        Comment {
            content: merge(&self.content, &current.content),
            updated_at_ms: now_ms,
            ..current.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TagPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub color: Option<Option<String>>,
}

impl Patch<Tag> for TagPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }

    fn apply(&self, current: &Tag, _now_ms: i64) -> Tag {
        Tag {
            name: merge(&self.name, &current.name),
            color: merge(&self.color, &current.color),
            ..current.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CustomFieldPatch {
    #[serde(default)]
    pub name: Option<String>,
}

impl Patch<CustomField> for CustomFieldPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    fn apply(&self, current: &CustomField, _now_ms: i64) -> CustomField {
        CustomField {
            name: merge(&self.name, &current.name),
            ..current.clone()
        }
    }
}
