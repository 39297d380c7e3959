#![forbid(unsafe_code)]

mod common;

use common::World;
use tl_core::EntityKind;
use tl_core::ids::UserId;
use tl_core::validate::{MemberRole, Violation};
use tl_storage::{FailureKind, StoreError};

#[test]
fn following_is_idempotent_and_limited_to_members() {
    let mut world = World::new();
    let task = world.task(world.owner.id, "Watched");

    world
        .store
        .follow_task(world.owner.id, task.id, world.member.id)
        .expect("follow");
    world
        .store
        .follow_task(world.member.id, task.id, world.member.id)
        .expect("follow again");
    world
        .store
        .follow_task(world.member.id, task.id, world.owner.id)
        .expect("second follower");
    let followers: Vec<_> = world
        .store
        .list_followers(world.member.id, task.id)
        .expect("list")
        .into_iter()
        .map(|user| user.id)
        .collect();
    assert_eq!(followers, [world.member.id, world.owner.id]);

    let err = world
        .store
        .follow_task(world.owner.id, task.id, world.outsider.id)
        .expect_err("outsider follows");
    assert!(matches!(
        err,
        StoreError::Invalid(Violation::NotAWorkspaceMember {
            role: MemberRole::Follower,
            ..
        })
    ));
    let err = world
        .store
        .follow_task(world.owner.id, task.id, UserId::new(31_337))
        .expect_err("unknown user");
    assert!(matches!(err, StoreError::NotFound(EntityKind::User)));
    let err = world
        .store
        .list_followers(world.outsider.id, task.id)
        .expect_err("outsider lists followers");
    assert_eq!(err.kind(), FailureKind::Forbidden);
}

#[test]
fn unfollowing_twice_is_not_found() {
    let mut world = World::new();
    let task = world.task(world.owner.id, "Watched");
    world
        .store
        .follow_task(world.member.id, task.id, world.member.id)
        .expect("follow");

    world
        .store
        .unfollow_task(world.member.id, task.id, world.member.id)
        .expect("unfollow");
    let err = world
        .store
        .unfollow_task(world.member.id, task.id, world.member.id)
        .expect_err("unfollow twice");
    assert!(matches!(err, StoreError::NotFound(EntityKind::TaskFollower)));
    assert!(world
        .store
        .list_followers(world.owner.id, task.id)
        .expect("list")
        .is_empty());
}
