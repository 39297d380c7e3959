#![forbid(unsafe_code)]

mod common;

use common::{World, register};
use tl_core::ids::{ProjectId, TaskId, WorkspaceId};
use tl_core::model::{NewComment, NewSection, NewTag, NewWorkspace};
use tl_core::patch::{CommentPatch, ProjectPatch, WorkspacePatch};
use tl_core::validate::{InputError, Violation};
use tl_core::{EntityKind, EntityRef, OwnedRef};
use tl_storage::{Denial, FailureKind, StoreError};

#[test]
fn outsider_is_forbidden_on_every_workspace_scoped_read() {
    let mut world = World::new();
    let task = world.task(world.owner.id, "Write brief");
    let outsider = world.outsider.id;
    let workspace_id = world.workspace.id;

    let err = world
        .store
        .get_project(outsider, world.project.id)
        .expect_err("outsider reads project");
    assert!(matches!(
        err,
        StoreError::Forbidden(Denial::NotMember { workspace_id: denied }) if denied == workspace_id
    ));
    assert_eq!(err.code(), "FORBIDDEN");

    let err = world.store.get_task(outsider, task.id).expect_err("outsider reads task");
    assert_eq!(err.kind(), FailureKind::Forbidden);
    let err = world
        .store
        .list_projects(outsider, workspace_id)
        .expect_err("outsider lists projects");
    assert_eq!(err.kind(), FailureKind::Forbidden);
    let err = world
        .store
        .list_comments(outsider, task.id)
        .expect_err("outsider lists comments");
    assert_eq!(err.kind(), FailureKind::Forbidden);
}

#[test]
fn outsider_writes_leave_state_unchanged() {
    let mut world = World::new();
    let task = world.task(world.owner.id, "Original");
    let outsider = world.outsider.id;

    let err = world
        .store
        .create_comment(
            outsider,
            task.id,
            NewComment {
                content: "drive-by".to_string(),
            },
        )
        .expect_err("outsider comments");
    assert_eq!(err.kind(), FailureKind::Forbidden);
    let err = world
        .store
        .create_tag(
            outsider,
            NewTag {
                workspace_id: world.workspace.id,
                name: "spam".to_string(),
                color: None,
            },
        )
        .expect_err("outsider tags");
    assert_eq!(err.kind(), FailureKind::Forbidden);
    let err = world
        .store
        .delete_task(outsider, task.id)
        .expect_err("outsider deletes task");
    assert_eq!(err.kind(), FailureKind::Forbidden);

    let owner = world.owner.id;
    assert_eq!(world.store.get_task(owner, task.id).expect("task survives"), task);
    assert!(world.store.list_comments(owner, task.id).expect("comments").is_empty());
    assert!(world
        .store
        .list_tags(owner, world.workspace.id)
        .expect("tags")
        .is_empty());
}

#[test]
fn missing_entities_are_not_found_before_membership_is_checked() {
    let mut world = World::new();
    let outsider = world.outsider.id;

    let err = world
        .store
        .get_project(outsider, ProjectId::new(9_999))
        .expect_err("missing project");
    assert!(matches!(err, StoreError::NotFound(EntityKind::Project)));
    let err = world
        .store
        .delete_task(outsider, TaskId::new(9_999))
        .expect_err("missing task");
    assert!(matches!(err, StoreError::NotFound(EntityKind::Task)));
    let err = world
        .store
        .get_workspace(outsider, WorkspaceId::new(9_999))
        .expect_err("missing workspace");
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn only_the_project_owner_may_edit_or_delete_it() {
    let mut world = World::new();
    let member = world.member.id;
    let project_id = world.project.id;

    let err = world
        .store
        .update_project(
            member,
            project_id,
            ProjectPatch {
                name: Some("Hijacked".to_string()),
                ..ProjectPatch::default()
            },
        )
        .expect_err("member renames project");
    assert!(matches!(
        err,
        StoreError::Forbidden(Denial::NotOwner {
            entity: EntityRef::Project(id)
        }) if id == project_id
    ));
    let err = world
        .store
        .delete_project(member, project_id)
        .expect_err("member deletes project");
    assert_eq!(err.kind(), FailureKind::Forbidden);

    let project = world
        .store
        .get_project(member, project_id)
        .expect("member still reads project");
    assert_eq!(project.name, "Launch");
    assert!(world.store.is_owner(world.owner.id, OwnedRef::Project(project_id)).expect("is_owner"));
    assert!(!world.store.is_owner(member, OwnedRef::Project(project_id)).expect("is_owner"));

    let renamed = world
        .store
        .update_project(
            world.owner.id,
            project_id,
            ProjectPatch {
                description: Some(Some("Q3 launch".to_string())),
                ..ProjectPatch::default()
            },
        )
        .expect("owner edits project");
    assert_eq!(renamed.description.as_deref(), Some("Q3 launch"));
    assert_eq!(renamed.name, "Launch");
}

#[test]
fn workspace_edits_are_owner_only() {
    let mut world = World::new();
    let workspace_id = world.workspace.id;

    let err = world
        .store
        .update_workspace(
            world.member.id,
            workspace_id,
            WorkspacePatch {
                name: Some("Mine now".to_string()),
            },
        )
        .expect_err("member renames workspace");
    assert_eq!(err.kind(), FailureKind::Forbidden);
    let err = world
        .store
        .delete_workspace(world.member.id, workspace_id)
        .expect_err("member deletes workspace");
    assert_eq!(err.kind(), FailureKind::Forbidden);
    let err = world
        .store
        .add_workspace_member(world.member.id, workspace_id, world.outsider.id)
        .expect_err("member invites");
    assert_eq!(err.kind(), FailureKind::Forbidden);

    let renamed = world
        .store
        .update_workspace(
            world.owner.id,
            workspace_id,
            WorkspacePatch {
                name: Some("  Acme Corp ".to_string()),
            },
        )
        .expect("owner renames");
    assert_eq!(renamed.name, "Acme Corp");
}

#[test]
fn comments_are_editable_by_their_author_only() {
    let mut world = World::new();
    let task = world.task(world.owner.id, "Discuss");
    let comment = world
        .store
        .create_comment(
            world.member.id,
            task.id,
            NewComment {
                content: "first".to_string(),
            },
        )
        .expect("member comments");
    assert_eq!(comment.author_id, world.member.id);

    let err = world
        .store
        .update_comment(
            world.owner.id,
            comment.id,
            CommentPatch {
                content: Some("rewritten".to_string()),
            },
        )
        .expect_err("workspace owner edits someone else's comment");
    assert_eq!(err.kind(), FailureKind::Forbidden);
    let err = world
        .store
        .delete_comment(world.owner.id, comment.id)
        .expect_err("workspace owner deletes someone else's comment");
    assert_eq!(err.kind(), FailureKind::Forbidden);

    let edited = world
        .store
        .update_comment(
            world.member.id,
            comment.id,
            CommentPatch {
                content: Some("second".to_string()),
            },
        )
        .expect("author edits");
    assert_eq!(edited.content, "second");
    assert!(edited.updated_at_ms >= comment.updated_at_ms);
}

#[test]
fn empty_patches_are_rejected_after_authorization() {
    let mut world = World::new();

    let err = world
        .store
        .update_project(world.member.id, world.project.id, ProjectPatch::default())
        .expect_err("member with empty patch");
    assert_eq!(err.kind(), FailureKind::Forbidden);

    let err = world
        .store
        .update_project(world.owner.id, world.project.id, ProjectPatch::default())
        .expect_err("owner with empty patch");
    assert!(matches!(err, StoreError::BadRequest(InputError::EmptyPatch)));
    assert_eq!(err.code(), "BAD_REQUEST");
}

#[test]
fn membership_lifecycle() {
    let mut world = World::new();
    let workspace_id = world.workspace.id;
    let owner = world.owner.id;
    let member = world.member.id;
    let outsider = world.outsider.id;

    world
        .store
        .add_workspace_member(owner, workspace_id, member)
        .expect("re-adding is a no-op");
    let members = world
        .store
        .list_workspace_members(member, workspace_id)
        .expect("list members");
    assert_eq!(members.len(), 2);

    let err = world
        .store
        .remove_workspace_member(owner, workspace_id, outsider)
        .expect_err("remove non-member");
    assert!(matches!(err, StoreError::NotFound(EntityKind::Membership)));

    let err = world
        .store
        .remove_workspace_member(owner, workspace_id, owner)
        .expect_err("owner leaves");
    assert!(matches!(
        err,
        StoreError::Invalid(Violation::OwnerMembershipRequired)
    ));
    assert_eq!(err.code(), "INVALID_STATE");

    world
        .store
        .remove_workspace_member(member, workspace_id, member)
        .expect("member leaves");
    assert!(!world.store.is_member(member, workspace_id).expect("is_member"));
    let err = world
        .store
        .get_project(member, world.project.id)
        .expect_err("former member reads project");
    assert_eq!(err.kind(), FailureKind::Forbidden);
}

#[test]
fn workspace_listing_follows_membership() {
    let mut world = World::new();
    let other_owner = register(&mut world.store, "other@example.com", "Other");
    let other = world
        .store
        .create_workspace(
            other_owner.id,
            NewWorkspace {
                name: "Elsewhere".to_string(),
            },
        )
        .expect("second workspace");

    let mine = world.store.list_workspaces(world.member.id).expect("list");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, world.workspace.id);

    let theirs = world.store.list_workspaces(other_owner.id).expect("list");
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].id, other.id);
    assert!(world
        .store
        .list_workspaces(world.outsider.id)
        .expect("list")
        .is_empty());
}

#[test]
fn cross_workspace_references_are_rejected() {
    let mut world = World::new();
    let other = world
        .store
        .create_workspace(
            world.owner.id,
            NewWorkspace {
                name: "Side".to_string(),
            },
        )
        .expect("side workspace");
    let side_tag = world
        .store
        .create_tag(
            world.owner.id,
            NewTag {
                workspace_id: other.id,
                name: "side".to_string(),
                color: None,
            },
        )
        .expect("side tag");
    let task = world.task(world.owner.id, "Main task");

    let err = world
        .store
        .tag_task(world.owner.id, task.id, side_tag.id)
        .expect_err("foreign tag");
    assert!(matches!(
        err,
        StoreError::Invalid(Violation::TagWorkspaceMismatch { .. })
    ));

    let side_project = world
        .store
        .create_project(
            world.owner.id,
            tl_core::model::NewProject::named(other.id, "Side project"),
        )
        .expect("side project");
    let side_section = world
        .store
        .create_section(
            world.owner.id,
            NewSection {
                project_id: side_project.id,
                name: "Backlog".to_string(),
                position: 0,
            },
        )
        .expect("side section");
    let err = world
        .store
        .create_task(
            world.owner.id,
            tl_core::model::NewTask {
                section_id: Some(side_section.id),
                ..tl_core::model::NewTask::named(world.project.id, "Misplaced")
            },
        )
        .expect_err("section from another project");
    assert!(matches!(
        err,
        StoreError::Invalid(Violation::SectionProjectMismatch { .. })
    ));
}

#[test]
fn resolve_workspace_walks_up_the_chain() {
    let mut world = World::new();
    let task = world.task(world.owner.id, "Chain");
    let comment = world
        .store
        .create_comment(
            world.owner.id,
            task.id,
            NewComment {
                content: "hi".to_string(),
            },
        )
        .expect("comment");

    for entity in [
        EntityRef::Project(world.project.id),
        EntityRef::Task(task.id),
        EntityRef::Comment(comment.id),
    ] {
        assert_eq!(
            world.store.resolve_workspace(entity).expect("resolve"),
            Some(world.workspace.id),
            "{entity}"
        );
    }
    assert_eq!(
        world
            .store
            .resolve_workspace(EntityRef::Task(TaskId::new(424_242)))
            .expect("resolve missing"),
        None
    );
}
