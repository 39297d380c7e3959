#![forbid(unsafe_code)]

use crate::ids::{ProjectId, SectionId, TeamId, UserId, WorkspaceId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub workspace_id: WorkspaceId,
    pub team_id: Option<TeamId>,
    pub owner_id: Option<UserId>,
    pub name: String,
    pub description: Option<String>,
    /// Stored and returned; not consulted by access checks.
    pub is_public: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewProject {
    pub workspace_id: WorkspaceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

impl NewProject {
    pub fn named(workspace_id: WorkspaceId, name: impl Into<String>) -> Self {
        Self {
            workspace_id,
            name: name.into(),
            description: None,
            team_id: None,
            is_public: true,
        }
    }
}

fn default_public() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub project_id: ProjectId,
    pub name: String,
    pub position: i64,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewSection {
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub position: i64,
}
