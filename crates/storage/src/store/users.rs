#![forbid(unsafe_code)]

use super::support::*;
use super::*;
use rusqlite::params;
use tl_core::Patch;
use tl_core::ids::UserId;
use tl_core::model::{NewUser, User, UserCredentials};
use tl_core::patch::UserPatch;
use tl_core::validate::{self, InputError};
use tracing::{debug_span, info};

impl SqliteStore {
    /// Credential hashing happens outside the store; only the hash is persisted.
    pub fn register_user(&mut self, request: NewUser) -> Result<User, StoreError> {
        let email = validate::normalize_email(&request.email)?;
        let name = validate::required_text("name", &request.name)?;
        let _span = debug_span!("user.register", email = %email).entered();

        let tx = self.write_tx()?;
        if user_by_email_tx(&tx, &email)?.is_some() {
            return Err(StoreError::Conflict("email already registered"));
        }

        let now_ms = now_ms();
        tx.execute(
            "INSERT INTO users(email, name, credential_hash, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![email, name, request.credential_hash, now_ms],
        )
        .map_err(|err| map_write_conflict(err, "email already registered"))?;
        let user_id = UserId::new(tx.last_insert_rowid());
        let user = found(user_tx(&tx, user_id)?, EntityKind::User)?;

        tx.commit()?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Lookup for an external credential verifier. Unknown emails are `None`, not an error.
    pub fn user_credentials(&self, email: &str) -> Result<Option<UserCredentials>, StoreError> {
        let Ok(email) = validate::normalize_email(email) else {
            return Ok(None);
        };
        let tx = self.read_tx()?;
        let Some(user) = user_by_email_tx(&tx, &email)? else {
            return Ok(None);
        };
        let credential_hash = tx.query_row(
            "SELECT credential_hash FROM users WHERE id = ?1",
            params![user.id.get()],
            |row| row.get::<_, String>(0),
        )?;
        Ok(Some(UserCredentials {
            user,
            credential_hash,
        }))
    }

    pub fn get_user(&self, actor: UserId, user_id: UserId) -> Result<User, StoreError> {
        let _span = debug_span!("user.get", actor = %actor, user_id = %user_id).entered();
        let tx = self.read_tx()?;
        found(user_tx(&tx, user_id)?, EntityKind::User)
    }

    /// Users only ever edit their own profile.
    pub fn update_user(&mut self, actor: UserId, patch: UserPatch) -> Result<User, StoreError> {
        let _span = debug_span!("user.update", actor = %actor).entered();

        let tx = self.write_tx()?;
        let current = found(user_tx(&tx, actor)?, EntityKind::User)?;
        if patch.is_empty() {
            return Err(InputError::EmptyPatch.into());
        }
        let patch = UserPatch {
            name: patch
                .name
                .as_deref()
                .map(|name| validate::required_text("name", name))
                .transpose()?,
        };

        let next = patch.apply(&current, now_ms());
        tx.execute(
            "UPDATE users SET name = ?2, updated_at_ms = ?3 WHERE id = ?1",
            params![next.id.get(), next.name, next.updated_at_ms],
        )?;

        tx.commit()?;
        Ok(next)
    }

    /// Removes the actor's own account.
    ///
    /// Fails with `Conflict` while the user still owns a workspace or created a task; memberships,
    /// follows and authored comments go with the account, and assignee, project owner and
    /// uploader references are cleared.
    pub fn delete_user(&mut self, actor: UserId) -> Result<(), StoreError> {
        let _span = debug_span!("user.delete", actor = %actor).entered();

        let tx = self.write_tx()?;
        found(user_tx(&tx, actor)?, EntityKind::User)?;
        tx.execute("DELETE FROM users WHERE id = ?1", params![actor.get()])
            .map_err(|err| {
                map_write_conflict(err, "user still owns workspaces or created tasks")
            })?;

        tx.commit()?;
        info!(user_id = %actor, "user deleted");
        Ok(())
    }
}
