#![forbid(unsafe_code)]

use crate::ids::{TagId, WorkspaceId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub color: Option<String>,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewTag {
    pub workspace_id: WorkspaceId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}
