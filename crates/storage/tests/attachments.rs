#![forbid(unsafe_code)]

mod common;

use common::World;
use tl_core::ids::TaskId;
use tl_core::model::{AttachmentTarget, NewAttachment, NewComment};
use tl_core::validate::{InputError, Violation};
use tl_core::EntityKind;
use tl_storage::{FailureKind, StoreError};

fn upload(task_id: Option<TaskId>, comment_id: Option<tl_core::ids::CommentId>) -> NewAttachment {
    NewAttachment {
        filename: "report.pdf".to_string(),
        url: "https://files.example.com/report.pdf".to_string(),
        task_id,
        comment_id,
    }
}

#[test]
fn an_attachment_has_exactly_one_parent() {
    let mut world = World::new();
    let task = world.task(world.owner.id, "Docs");
    let comment = world
        .store
        .create_comment(
            world.owner.id,
            task.id,
            NewComment {
                content: "attached below".to_string(),
            },
        )
        .expect("comment");

    let err = world
        .store
        .create_attachment(world.owner.id, upload(None, None))
        .expect_err("no parent");
    assert!(matches!(
        err,
        StoreError::Invalid(Violation::AttachmentTargetMissing)
    ));
    let err = world
        .store
        .create_attachment(world.owner.id, upload(Some(task.id), Some(comment.id)))
        .expect_err("two parents");
    assert!(matches!(
        err,
        StoreError::Invalid(Violation::AttachmentTargetAmbiguous)
    ));

    let on_task = world
        .store
        .create_attachment(world.member.id, upload(Some(task.id), None))
        .expect("task attachment");
    let on_comment = world
        .store
        .create_attachment(world.member.id, upload(None, Some(comment.id)))
        .expect("comment attachment");
    assert_eq!(on_task.target, AttachmentTarget::Task(task.id));
    assert_eq!(on_task.uploader_id, Some(world.member.id));
    assert_eq!(on_comment.target, AttachmentTarget::Comment(comment.id));

    assert_eq!(
        world
            .store
            .list_task_attachments(world.owner.id, task.id)
            .expect("task list"),
        vec![on_task]
    );
    assert_eq!(
        world
            .store
            .list_comment_attachments(world.owner.id, comment.id)
            .expect("comment list"),
        vec![on_comment]
    );
}

#[test]
fn attachment_input_is_checked() {
    let mut world = World::new();
    let task = world.task(world.owner.id, "Docs");

    let err = world
        .store
        .create_attachment(
            world.owner.id,
            NewAttachment {
                url: "not a url".to_string(),
                ..upload(Some(task.id), None)
            },
        )
        .expect_err("bad url");
    assert!(matches!(err, StoreError::BadRequest(InputError::InvalidUrl)));

    let err = world
        .store
        .create_attachment(
            world.owner.id,
            NewAttachment {
                url: "file:///etc/passwd".to_string(),
                ..upload(Some(task.id), None)
            },
        )
        .expect_err("local url");
    assert!(matches!(
        err,
        StoreError::BadRequest(InputError::UnsupportedUrlScheme { .. })
    ));

    let err = world
        .store
        .create_attachment(
            world.owner.id,
            NewAttachment {
                filename: "   ".to_string(),
                ..upload(Some(task.id), None)
            },
        )
        .expect_err("blank filename");
    assert!(matches!(
        err,
        StoreError::BadRequest(InputError::Blank { field: "filename" })
    ));

    let err = world
        .store
        .create_attachment(world.owner.id, upload(Some(TaskId::new(77_777)), None))
        .expect_err("missing task");
    assert!(matches!(err, StoreError::NotFound(EntityKind::Task)));

    let err = world
        .store
        .create_attachment(world.outsider.id, upload(Some(task.id), None))
        .expect_err("outsider uploads");
    assert_eq!(err.kind(), FailureKind::Forbidden);
}

#[test]
fn only_the_uploader_deletes_an_attachment() {
    let mut world = World::new();
    let task = world.task(world.owner.id, "Docs");
    let attachment = world
        .store
        .create_attachment(world.member.id, upload(Some(task.id), None))
        .expect("upload");

    let err = world
        .store
        .delete_attachment(world.owner.id, attachment.id)
        .expect_err("owner deletes member upload");
    assert_eq!(err.kind(), FailureKind::Forbidden);

    world
        .store
        .delete_attachment(world.member.id, attachment.id)
        .expect("uploader deletes");
    let err = world
        .store
        .get_attachment(world.member.id, attachment.id)
        .expect_err("gone");
    assert!(matches!(err, StoreError::NotFound(EntityKind::Attachment)));
}
