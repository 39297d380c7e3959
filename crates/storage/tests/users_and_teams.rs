#![forbid(unsafe_code)]

mod common;

use common::{World, open_store, register};
use tl_core::EntityKind;
use tl_core::model::{NewTeam, NewUser};
use tl_core::patch::{TeamPatch, UserPatch};
use tl_core::validate::{InputError, MemberRole, Violation};
use tl_storage::{FailureKind, StoreError};

#[test]
fn registration_normalizes_email_and_rejects_duplicates() {
    let mut store = open_store();
    let user = register(&mut store, "  Ada@Example.COM ", " Ada ");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.name, "Ada");

    let err = store
        .register_user(NewUser {
            email: "ada@example.com".to_string(),
            name: "Impostor".to_string(),
            credential_hash: "x".to_string(),
        })
        .expect_err("duplicate email");
    assert!(matches!(err, StoreError::Conflict(_)));
    assert_eq!(err.code(), "CONFLICT");

    let err = store
        .register_user(NewUser {
            email: "not-an-email".to_string(),
            name: "Nobody".to_string(),
            credential_hash: "x".to_string(),
        })
        .expect_err("malformed email");
    assert!(matches!(err, StoreError::BadRequest(InputError::InvalidEmail)));
}

#[test]
fn credentials_are_looked_up_by_normalized_email() {
    let mut store = open_store();
    let user = register(&mut store, "grace@example.com", "Grace");

    let found = store
        .user_credentials("GRACE@example.com")
        .expect("lookup")
        .expect("known user");
    assert_eq!(found.user, user);
    assert_eq!(found.credential_hash, "hash:grace@example.com");

    assert!(store.user_credentials("nobody@example.com").expect("lookup").is_none());
    assert!(store.user_credentials("garbage").expect("lookup").is_none());
}

#[test]
fn users_edit_only_their_own_profile() {
    let mut store = open_store();
    let user = register(&mut store, "linus@example.com", "Linus");

    let updated = store
        .update_user(
            user.id,
            UserPatch {
                name: Some("Linus T".to_string()),
            },
        )
        .expect("rename self");
    assert_eq!(updated.name, "Linus T");
    assert_eq!(updated.email, user.email);
    assert_eq!(store.get_user(user.id, user.id).expect("reload"), updated);

    let err = store
        .update_user(user.id, UserPatch::default())
        .expect_err("empty patch");
    assert!(matches!(err, StoreError::BadRequest(InputError::EmptyPatch)));
    let err = store
        .update_user(
            user.id,
            UserPatch {
                name: Some("   ".to_string()),
            },
        )
        .expect_err("blank name");
    assert_eq!(err.kind(), FailureKind::BadRequest);
}

#[test]
fn the_team_creator_joins_and_members_must_come_from_the_workspace() {
    let mut world = World::new();
    let team = world
        .store
        .create_team(
            world.member.id,
            NewTeam {
                workspace_id: world.workspace.id,
                name: "Design".to_string(),
            },
        )
        .expect("create team");
    assert!(team.has_member(world.member.id));
    assert!(world.store.is_team_member(world.member.id, team.id).expect("check"));

    let err = world
        .store
        .add_team_member(world.member.id, team.id, world.outsider.id)
        .expect_err("outsider joins team");
    assert!(matches!(
        err,
        StoreError::Invalid(Violation::NotAWorkspaceMember {
            role: MemberRole::TeamMember,
            ..
        })
    ));

    let team = world
        .store
        .add_team_member(world.member.id, team.id, world.owner.id)
        .expect("add owner");
    let again = world
        .store
        .add_team_member(world.member.id, team.id, world.owner.id)
        .expect("add owner again");
    assert_eq!(again.members.len(), 2);
    assert_eq!(again, team);

    let team = world
        .store
        .remove_team_member(world.owner.id, team.id, world.owner.id)
        .expect("owner leaves team");
    assert!(!team.has_member(world.owner.id));
    let err = world
        .store
        .remove_team_member(world.owner.id, team.id, world.owner.id)
        .expect_err("leave twice");
    assert!(matches!(err, StoreError::NotFound(EntityKind::TeamMembership)));

    let renamed = world
        .store
        .update_team(
            world.owner.id,
            team.id,
            TeamPatch {
                name: Some("Product Design".to_string()),
            },
        )
        .expect("rename team");
    assert_eq!(renamed.name, "Product Design");
    let teams = world
        .store
        .list_teams(world.owner.id, world.workspace.id)
        .expect("list teams");
    assert_eq!(teams, vec![renamed]);
}

#[test]
fn leaving_a_workspace_also_leaves_its_teams() {
    let mut world = World::new();
    let team = world
        .store
        .create_team(
            world.owner.id,
            NewTeam {
                workspace_id: world.workspace.id,
                name: "Ops".to_string(),
            },
        )
        .expect("team");
    world
        .store
        .add_team_member(world.owner.id, team.id, world.member.id)
        .expect("add member");

    world
        .store
        .remove_workspace_member(world.owner.id, world.workspace.id, world.member.id)
        .expect("owner removes member");

    let team = world.store.get_team(world.owner.id, team.id).expect("team");
    assert!(!team.has_member(world.member.id));
    assert!(!world.store.is_team_member(world.member.id, team.id).expect("check"));
}
