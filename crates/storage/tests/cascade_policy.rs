#![forbid(unsafe_code)]

mod common;

use common::World;
use tl_core::EntityKind;
use tl_core::model::{
    AttachmentTarget, NewAttachment, NewComment, NewCustomField, NewSection, NewTag, NewTask,
    NewTeam, CustomFieldValuePayload, FieldType,
};
use tl_storage::{FailureKind, StoreError};

#[test]
fn deleting_a_user_clears_references_and_drops_owned_rows() {
    let mut world = World::new();
    let owner = world.owner.id;
    let member = world.member.id;
    let task = world
        .store
        .create_task(
            owner,
            NewTask {
                assignee_id: Some(member),
                ..NewTask::named(world.project.id, "Assigned")
            },
        )
        .expect("create assigned task");
    world
        .store
        .create_comment(
            member,
            task.id,
            NewComment {
                content: "on it".to_string(),
            },
        )
        .expect("member comments");
    let attachment = world
        .store
        .create_attachment(
            member,
            NewAttachment {
                filename: "notes.txt".to_string(),
                url: "https://files.example.com/notes.txt".to_string(),
                task_id: Some(task.id),
                comment_id: None,
            },
        )
        .expect("member uploads");
    world
        .store
        .follow_task(owner, task.id, member)
        .expect("member follows");

    world.store.delete_user(member).expect("member deletes account");

    let task = world.store.get_task(owner, task.id).expect("task survives");
    assert_eq!(task.assignee_id, None);
    assert!(world.store.list_comments(owner, task.id).expect("comments").is_empty());
    assert!(world.store.list_followers(owner, task.id).expect("followers").is_empty());
    let attachment = world
        .store
        .get_attachment(owner, attachment.id)
        .expect("attachment survives");
    assert_eq!(attachment.uploader_id, None);
    let members = world
        .store
        .list_workspace_members(owner, world.workspace.id)
        .expect("members");
    assert_eq!(members.len(), 1);
}

#[test]
fn a_user_who_still_owns_a_workspace_cannot_be_deleted() {
    let mut world = World::new();
    let err = world
        .store
        .delete_user(world.owner.id)
        .expect_err("owner deletes account");
    assert!(matches!(err, StoreError::Conflict(_)));
    world
        .store
        .get_workspace(world.owner.id, world.workspace.id)
        .expect("workspace intact");
}

#[test]
fn a_user_who_created_tasks_cannot_be_deleted() {
    let mut world = World::new();
    world.task(world.member.id, "Member task");
    let err = world
        .store
        .delete_user(world.member.id)
        .expect_err("creator deletes account");
    assert_eq!(err.kind(), FailureKind::Conflict);
}

#[test]
fn deleting_a_task_takes_its_dependents_along() {
    let mut world = World::new();
    let owner = world.owner.id;
    let parent = world.task(owner, "Parent");
    let child = world
        .store
        .create_task(
            owner,
            NewTask {
                parent_task_id: Some(parent.id),
                ..NewTask::named(world.project.id, "Child")
            },
        )
        .expect("subtask");
    let comment = world
        .store
        .create_comment(
            owner,
            parent.id,
            NewComment {
                content: "see attachment".to_string(),
            },
        )
        .expect("comment");
    let comment_attachment = world
        .store
        .create_attachment(
            owner,
            NewAttachment {
                filename: "diagram.png".to_string(),
                url: "https://files.example.com/diagram.png".to_string(),
                task_id: None,
                comment_id: Some(comment.id),
            },
        )
        .expect("comment attachment");
    assert_eq!(comment_attachment.target, AttachmentTarget::Comment(comment.id));
    let tag = world
        .store
        .create_tag(
            owner,
            NewTag {
                workspace_id: world.workspace.id,
                name: "urgent".to_string(),
                color: None,
            },
        )
        .expect("tag");
    world.store.tag_task(owner, parent.id, tag.id).expect("tag parent");
    let field = world
        .store
        .create_custom_field(
            owner,
            NewCustomField {
                project_id: world.project.id,
                name: "Estimate".to_string(),
                field_type: FieldType::Number,
                options: Vec::new(),
            },
        )
        .expect("field");
    world
        .store
        .set_field_value(owner, parent.id, field.id, CustomFieldValuePayload::number(3.0))
        .expect("value");

    world.store.delete_task(owner, parent.id).expect("delete parent");

    for err in [
        world.store.get_task(owner, parent.id).expect_err("parent gone"),
        world.store.get_task(owner, child.id).expect_err("child gone"),
        world.store.get_comment(owner, comment.id).expect_err("comment gone"),
        world
            .store
            .get_attachment(owner, comment_attachment.id)
            .expect_err("attachment gone"),
    ] {
        assert_eq!(err.kind(), FailureKind::NotFound);
    }
    world.store.get_tag(owner, tag.id).expect("tag itself survives");
    world
        .store
        .get_custom_field(owner, field.id)
        .expect("field itself survives");
}

#[test]
fn deleting_a_section_or_team_detaches_instead_of_deleting() {
    let mut world = World::new();
    let owner = world.owner.id;
    let section = world
        .store
        .create_section(
            owner,
            NewSection {
                project_id: world.project.id,
                name: "Doing".to_string(),
                position: 1,
            },
        )
        .expect("section");
    let task = world
        .store
        .create_task(
            owner,
            NewTask {
                section_id: Some(section.id),
                ..NewTask::named(world.project.id, "Sectioned")
            },
        )
        .expect("task in section");
    let team = world
        .store
        .create_team(
            owner,
            NewTeam {
                workspace_id: world.workspace.id,
                name: "Platform".to_string(),
            },
        )
        .expect("team");
    let project = world
        .store
        .create_project(
            owner,
            tl_core::model::NewProject {
                team_id: Some(team.id),
                ..tl_core::model::NewProject::named(world.workspace.id, "Team project")
            },
        )
        .expect("team project");

    world.store.delete_section(owner, section.id).expect("delete section");
    world.store.delete_team(owner, team.id).expect("delete team");

    assert_eq!(
        world.store.get_task(owner, task.id).expect("task survives").section_id,
        None
    );
    assert_eq!(
        world
            .store
            .get_project(owner, project.id)
            .expect("project survives")
            .team_id,
        None
    );
}

#[test]
fn deleting_a_workspace_removes_everything_inside_it() {
    let mut world = World::new();
    let owner = world.owner.id;
    let task = world.task(owner, "Doomed");

    world
        .store
        .delete_workspace(owner, world.workspace.id)
        .expect("delete workspace");

    let err = world
        .store
        .get_project(owner, world.project.id)
        .expect_err("project gone");
    assert!(matches!(err, StoreError::NotFound(EntityKind::Project)));
    let err = world.store.get_task(owner, task.id).expect_err("task gone");
    assert!(matches!(err, StoreError::NotFound(EntityKind::Task)));
    assert!(world.store.list_workspaces(world.member.id).expect("list").is_empty());

    world
        .store
        .delete_user(world.member.id)
        .expect("member no longer pinned by anything");
}

#[test]
fn an_orphaned_project_cannot_be_administered() {
    let mut world = World::new();
    let member = world.member.id;
    let project = world
        .store
        .create_project(
            member,
            tl_core::model::NewProject::named(world.workspace.id, "Member project"),
        )
        .expect("member project");

    world.store.delete_user(member).expect("delete member");

    let orphan = world
        .store
        .get_project(world.owner.id, project.id)
        .expect("project survives");
    assert_eq!(orphan.owner_id, None);
    let err = world
        .store
        .delete_project(world.owner.id, project.id)
        .expect_err("nobody owns it");
    assert_eq!(err.kind(), FailureKind::Forbidden);
}
