#![forbid(unsafe_code)]
#![allow(dead_code)]

use tl_core::ids::UserId;
use tl_core::model::{NewProject, NewTask, NewUser, NewWorkspace, Project, Task, User, Workspace};
use tl_storage::SqliteStore;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn open_store() -> SqliteStore {
    init_tracing();
    SqliteStore::open_in_memory().expect("open in-memory store")
}

pub fn register(store: &mut SqliteStore, email: &str, name: &str) -> User {
    store
        .register_user(NewUser {
            email: email.to_string(),
            name: name.to_string(),
            credential_hash: format!("hash:{email}"),
        })
        .expect("register user")
}

/// A workspace owned by `owner`, with `member` added and `outsider` registered but not a member,
/// plus one project owned by `owner`.
pub struct World {
    pub store: SqliteStore,
    pub owner: User,
    pub member: User,
    pub outsider: User,
    pub workspace: Workspace,
    pub project: Project,
}

impl World {
    pub fn new() -> Self {
        let mut store = open_store();
        let owner = register(&mut store, "owner@example.com", "Owner");
        let member = register(&mut store, "member@example.com", "Member");
        let outsider = register(&mut store, "outsider@example.com", "Outsider");
        let workspace = store
            .create_workspace(
                owner.id,
                NewWorkspace {
                    name: "Acme".to_string(),
                },
            )
            .expect("create workspace");
        store
            .add_workspace_member(owner.id, workspace.id, member.id)
            .expect("add member");
        let project = store
            .create_project(owner.id, NewProject::named(workspace.id, "Launch"))
            .expect("create project");
        Self {
            store,
            owner,
            member,
            outsider,
            workspace,
            project,
        }
    }

    pub fn task(&mut self, actor: UserId, name: &str) -> Task {
        self.store
            .create_task(actor, NewTask::named(self.project.id, name))
            .expect("create task")
    }
}
