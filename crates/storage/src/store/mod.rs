#![forbid(unsafe_code)]

mod attachments;
mod authority;
mod comments;
mod custom_fields;
mod error;
mod followers;
mod members;
mod projects;
mod sections;
mod support;
mod tags;
mod tasks;
mod teams;
mod users;
mod workspaces;

pub use error::{Denial, FailureKind, StoreError};

use crate::config::StoreConfig;
use authority::{authorize_member_tx, authorize_owner_tx, ensure_member_tx, is_member_tx};
use error::{Constraint, constraint_of, map_write_conflict};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use support::install_schema;
use tl_core::EntityKind;
use tracing::info;

const DB_FILE: &str = "tasklane.db";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    config: StoreConfig,
}

impl SqliteStore {
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;

        let conn = match config.storage_dir.as_deref() {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Connection::open(dir.join(DB_FILE))?
            }
            None => Connection::open_in_memory()?,
        };
        conn.busy_timeout(config.busy_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        if config.storage_dir.is_some() {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            if !mode.eq_ignore_ascii_case("wal") {
                return Err(StoreError::Config(format!(
                    "journal_mode stayed {mode} instead of wal"
                )));
            }
        }

        install_schema(&conn)?;
        info!(
            storage_dir = ?config.storage_dir,
            busy_timeout_ms = u64::try_from(config.busy_timeout.as_millis()).unwrap_or(u64::MAX),
            "store opened"
        );

        Ok(Self { conn, config })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(StoreConfig::default())
    }

    pub fn open_dir(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(StoreConfig::in_dir(storage_dir.as_ref()))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Deferred transaction: every statement of a read sees the same snapshot.
    fn read_tx(&self) -> Result<Transaction<'_>, StoreError> {
        Ok(self.conn.unchecked_transaction()?)
    }

    /// Takes the write lock up front so authorization reads and the commit cannot interleave
    /// with another writer.
    fn write_tx(&mut self) -> Result<Transaction<'_>, StoreError> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}

/// Page windows past `i64::MAX` simply come back empty.
fn to_sqlite_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn found<T>(value: Option<T>, kind: EntityKind) -> Result<T, StoreError> {
    value.ok_or(StoreError::NotFound(kind))
}
