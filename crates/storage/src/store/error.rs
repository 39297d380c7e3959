#![forbid(unsafe_code)]

use rusqlite::ffi;
use tl_core::validate::{InputError, Violation};
use tl_core::{EntityKind, EntityRef};
use tl_core::ids::WorkspaceId;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("{0} not found")]
    NotFound(EntityKind),
    #[error("forbidden: {0}")]
    Forbidden(Denial),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("invalid state: {0}")]
    Invalid(#[from] Violation),
    #[error("bad request: {0}")]
    BadRequest(#[from] InputError),
    #[error("custom field type {0:?} has no value slot")]
    UnmappedFieldType(String),
    #[error("config: {0}")]
    Config(String),
}

/// Which authorization stage rejected the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    #[error("not a member of workspace {workspace_id}")]
    NotMember { workspace_id: WorkspaceId },
    #[error("not the owner of {entity}")]
    NotOwner { entity: EntityRef },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NotFound,
    Forbidden,
    Conflict,
    InvalidState,
    BadRequest,
    Internal,
}

impl FailureKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::InvalidState => "INVALID_STATE",
            Self::BadRequest => "BAD_REQUEST",
            Self::Internal => "INTERNAL",
        }
    }
}

impl StoreError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Forbidden(_) => FailureKind::Forbidden,
            Self::Conflict(_) => FailureKind::Conflict,
            Self::Invalid(_) => FailureKind::InvalidState,
            Self::BadRequest(_) => FailureKind::BadRequest,
            Self::Io(_) | Self::Sql(_) | Self::UnmappedFieldType(_) | Self::Config(_) => {
                FailureKind::Internal
            }
        }
    }

    /// Stable outward code for a transport to map onto its own status space.
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Constraint {
    Unique,
    ForeignKey,
    Check,
    Other,
}

pub(super) fn constraint_of(err: &rusqlite::Error) -> Option<Constraint> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    Constraint::Unique
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Constraint::ForeignKey,
                ffi::SQLITE_CONSTRAINT_CHECK => Constraint::Check,
                _ => Constraint::Other,
            })
        }
        _ => None,
    }
}

/// Translates a uniqueness or restrict failure raised by the store itself into `Conflict`.
///
/// Reaching this means a concurrent writer slipped past the application-level pre-check.
pub(super) fn map_write_conflict(err: rusqlite::Error, conflict: &'static str) -> StoreError {
    match constraint_of(&err) {
        Some(constraint @ (Constraint::Unique | Constraint::ForeignKey)) => {
            warn!(?constraint, conflict, "store constraint rejected write");
            StoreError::Conflict(conflict)
        }
        _ => StoreError::Sql(err),
    }
}
