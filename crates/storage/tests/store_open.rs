#![forbid(unsafe_code)]

mod common;

use std::time::Duration;
use tl_core::model::NewWorkspace;
use tl_storage::{FailureKind, SqliteStore, StoreConfig, StoreError};

#[test]
fn file_backed_store_survives_reopen() {
    common::init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let storage_dir = dir.path().join("nested").join("data");

    let (user, workspace) = {
        let mut store = SqliteStore::open_dir(&storage_dir).expect("first open");
        let user = common::register(&mut store, "keep@example.com", "Keep");
        let workspace = store
            .create_workspace(
                user.id,
                NewWorkspace {
                    name: "Persistent".to_string(),
                },
            )
            .expect("workspace");
        (user, workspace)
    };
    assert!(storage_dir.join("tasklane.db").is_file());

    let store = SqliteStore::open_dir(&storage_dir).expect("second open");
    assert_eq!(store.config().storage_dir.as_deref(), Some(storage_dir.as_path()));
    assert_eq!(
        store.get_workspace(user.id, workspace.id).expect("reload"),
        workspace
    );
    assert_eq!(
        store
            .user_credentials("keep@example.com")
            .expect("lookup")
            .map(|found| found.user),
        Some(user)
    );
}

#[test]
fn file_backed_store_runs_in_wal_mode_with_foreign_keys() {
    common::init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    drop(SqliteStore::open_dir(dir.path()).expect("open"));

    let conn = rusqlite::Connection::open(dir.path().join("tasklane.db")).expect("raw open");
    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .expect("journal mode");
    assert_eq!(mode.to_ascii_lowercase(), "wal");
    let version: String = conn
        .query_row("SELECT value FROM meta WHERE key = 'schema_version'", [], |row| {
            row.get(0)
        })
        .expect("schema version");
    assert_eq!(version, "1");
}

#[test]
fn invalid_configuration_is_rejected_at_open() {
    common::init_tracing();
    let err = SqliteStore::open(StoreConfig {
        default_page_limit: 50,
        max_page_limit: 10,
        ..StoreConfig::default()
    })
    .expect_err("default above max");
    assert!(matches!(err, StoreError::Config(_)));
    assert_eq!(err.kind(), FailureKind::Internal);
}

#[test]
fn configuration_reads_overrides_from_a_lookup() {
    let config = StoreConfig::from_lookup(|key| match key {
        "TASKLANE_BUSY_TIMEOUT_MS" => Some("250".to_string()),
        "TASKLANE_PAGE_LIMIT_MAX" => Some("40".to_string()),
        _ => None,
    })
    .expect("config");
    assert_eq!(config.busy_timeout, Duration::from_millis(250));
    assert_eq!(config.max_page_limit, 40);
    assert_eq!(config.default_page_limit, 20);
    assert_eq!(config.storage_dir, None);

    let store = SqliteStore::open(config.clone()).expect("open with overrides");
    assert_eq!(store.config(), &config);
}
