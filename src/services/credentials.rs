//! Credential store: salted password hashes keyed by username.

use sqlx::SqlitePool;

use crate::core::config::{SeedSettings, DEFAULT_SEED_ADMIN_PASSWORD};
use crate::core::security::{self, SecurityError};
use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::services::{required_text, RecordsError, RecordsResult};

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 64;
const PASSWORD_MAX_LEN: usize = 128;

pub(crate) struct NewUser<'a> {
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
    pub(crate) role: UserRole,
    pub(crate) full_name: &'a str,
    pub(crate) group_link: &'a str,
    /// Roster entry for a student account. Only administrators set this.
    pub(crate) student_id: Option<i64>,
}

pub(crate) fn validate_username(username: &str) -> RecordsResult<()> {
    let length = username.chars().count();
    let charset_ok = username
        .chars()
        .all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '.' | '-'));

    if (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&length) && charset_ok {
        Ok(())
    } else {
        Err(RecordsError::Validation(format!(
            "username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} letters, digits, '_', '.' or '-'"
        )))
    }
}

fn validate_password(password: &str) -> RecordsResult<()> {
    if password.is_empty() {
        return Err(RecordsError::Validation("password must not be empty".to_string()));
    }
    if password.chars().count() > PASSWORD_MAX_LEN {
        return Err(RecordsError::Validation(format!(
            "password must be at most {PASSWORD_MAX_LEN} characters long"
        )));
    }
    Ok(())
}

/// Fails with [`RecordsError::DuplicateUser`] when the username is taken.
pub(crate) async fn create(pool: &SqlitePool, new_user: NewUser<'_>) -> RecordsResult<User> {
    validate_username(new_user.username)?;
    validate_password(new_user.password)?;
    let full_name = required_text("full_name", new_user.full_name)?;

    let hashed_password = security::hash_password(new_user.password)?;

    if new_user.student_id.is_some() && new_user.role != UserRole::Student {
        return Err(RecordsError::Validation(
            "only student accounts can be linked to a roster entry".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;
    if repositories::users::exists(&mut *tx, new_user.username).await? {
        return Err(RecordsError::DuplicateUser(new_user.username.to_string()));
    }
    if let Some(student_id) = new_user.student_id {
        if repositories::students::find_by_id(&mut *tx, student_id).await?.is_none() {
            return Err(RecordsError::NotFound(format!("Student {student_id}")));
        }
        if repositories::users::student_link_taken(&mut *tx, student_id).await? {
            return Err(RecordsError::StudentAlreadyLinked(student_id));
        }
    }

    let user = repositories::users::create(
        &mut *tx,
        repositories::users::CreateUser {
            username: new_user.username,
            hashed_password,
            role: new_user.role,
            full_name: &full_name,
            group_link: new_user.group_link.trim(),
            student_id: new_user.student_id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|err| match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            RecordsError::DuplicateUser(new_user.username.to_string())
        }
        other => RecordsError::Persistence(other),
    })?;
    tx.commit().await?;

    tracing::info!(username = %user.username, role = user.role.as_str(), "User created");
    Ok(user)
}

/// `Ok(None)` means "invalid credentials"; it is not an error condition.
pub(crate) async fn verify(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> RecordsResult<Option<User>> {
    let Some(user) = repositories::users::find_by_username(pool, username).await? else {
        security::verify_against_dummy(password);
        return Ok(None);
    };

    match security::verify_password(password, &user.hashed_password) {
        Ok(true) => Ok(Some(user)),
        Ok(false) => Ok(None),
        Err(SecurityError::Verification) => {
            tracing::warn!(username = %username, "Stored password hash is unreadable");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> RecordsResult<User> {
    verify(pool, username, password).await?.ok_or(RecordsError::InvalidCredentials)
}

/// Creates the seed administrator unless the username already exists.
/// Existing rows are never modified. Returns whether a row was inserted.
pub(crate) async fn ensure_seed_admin(pool: &SqlitePool, seed: &SeedSettings) -> RecordsResult<bool> {
    if seed.admin_password == DEFAULT_SEED_ADMIN_PASSWORD {
        tracing::warn!(
            username = %seed.admin_username,
            "Seed administrator uses the well-known default password; set SEED_ADMIN_PASSWORD \
             and change it after first login"
        );
    }

    if repositories::users::exists(pool, &seed.admin_username).await? {
        tracing::debug!(username = %seed.admin_username, "Seed administrator already present");
        return Ok(false);
    }

    let hashed_password = security::hash_password(&seed.admin_password)?;
    let inserted = repositories::users::insert_if_absent(
        pool,
        repositories::users::CreateUser {
            username: &seed.admin_username,
            hashed_password,
            role: UserRole::Admin,
            full_name: &seed.admin_full_name,
            group_link: &seed.admin_group_link,
            student_id: None,
            created_at: primitive_now_utc(),
        },
    )
    .await?;

    if inserted {
        tracing::info!(username = %seed.admin_username, "Created seed administrator");
    }
    Ok(inserted)
}
