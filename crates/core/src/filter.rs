#![forbid(unsafe_code)]

//! Task listing parameters as received from a client, and their resolved form.

use crate::ids::{ProjectId, UserId, WorkspaceId};
use crate::validate::InputError;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssigneeFilter {
    Me,
    User(UserId),
}

impl AssigneeFilter {
    /// `"me"` or a decimal user id; anything else is rejected.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let value = raw.trim();
        if value == "me" {
            return Ok(Self::Me);
        }
        value
            .parse::<i64>()
            .map(|id| Self::User(UserId::new(id)))
            .map_err(|_| InputError::InvalidAssignee {
                raw: raw.to_string(),
            })
    }

    pub fn resolve(self, actor: UserId) -> UserId {
        match self {
            Self::Me => actor,
            Self::User(user_id) => user_id,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

/// `workspace_id` is required; every other field narrows the result.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TaskQuery {
    pub workspace_id: WorkspaceId,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub completed_since_ms: Option<i64>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

impl TaskQuery {
    pub fn for_workspace(workspace_id: WorkspaceId) -> Self {
        Self {
            workspace_id,
            project_id: None,
            assignee: None,
            completed: None,
            completed_since_ms: None,
            limit: None,
            offset: 0,
        }
    }

    /// Parses the assignee and applies page limits. The scope ids are carried over unchecked.
    ///
    /// A blank assignee is the same as no assignee filter.
    pub fn resolve(&self, actor: UserId, limits: PageLimits) -> Result<TaskFilter, InputError> {
        let assignee_id = self
            .assignee
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(AssigneeFilter::parse)
            .transpose()?
            .map(|filter| filter.resolve(actor));

        let limit = self.limit.unwrap_or(limits.default_limit);
        if limit == 0 || limit > limits.max_limit {
            return Err(InputError::LimitOutOfRange {
                limit,
                max: limits.max_limit,
            });
        }

        Ok(TaskFilter {
            workspace_id: self.workspace_id,
            project_id: self.project_id,
            assignee_id,
            completed: self.completed,
            completed_since_ms: self.completed_since_ms,
            limit,
            offset: self.offset,
        })
    }
}

/// A resolved task predicate plus the page window. Count and page queries share the predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskFilter {
    pub workspace_id: WorkspaceId,
    pub project_id: Option<ProjectId>,
    pub assignee_id: Option<UserId>,
    pub completed: Option<bool>,
    pub completed_since_ms: Option<i64>,
    pub limit: usize,
    pub offset: usize,
}
