#![forbid(unsafe_code)]

use super::User;
use crate::ids::{TeamId, UserId, WorkspaceId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub owner_id: UserId,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewWorkspace {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub created_at_ms: i64,
    pub members: Vec<User>,
}

impl Team {
    pub fn has_member(&self, user_id: UserId) -> bool {
        self.members.iter().any(|member| member.id == user_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewTeam {
    pub workspace_id: WorkspaceId,
    pub name: String,
}
