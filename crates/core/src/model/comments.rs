#![forbid(unsafe_code)]

use crate::ids::{AttachmentId, CommentId, TaskId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    pub author_id: UserId,
    pub content: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewComment {
    #[serde(alias = "text")]
    pub content: String,
}

/// The single parent of an attachment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentTarget {
    Task(TaskId),
    Comment(CommentId),
}

impl AttachmentTarget {
    pub fn task_id(self) -> Option<TaskId> {
        match self {
            Self::Task(id) => Some(id),
            Self::Comment(_) => None,
        }
    }

    pub fn comment_id(self) -> Option<CommentId> {
        match self {
            Self::Task(_) => None,
            Self::Comment(id) => Some(id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub target: AttachmentTarget,
    pub uploader_id: Option<UserId>,
    pub filename: String,
    pub url: String,
    pub created_at_ms: i64,
}

/// Upload payload as received from a client; the target pair is checked before insert.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewAttachment {
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub comment_id: Option<CommentId>,
}
