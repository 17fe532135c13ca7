use sqlx::SqlitePool;

use crate::core::config::ReferenceData;
use crate::db::models::Student;
use crate::repositories;
use crate::services::{ensure_group, required_text, RecordsError, RecordsResult};

pub(crate) async fn add_student(
    pool: &SqlitePool,
    reference: &ReferenceData,
    group: &str,
    full_name: &str,
) -> RecordsResult<Student> {
    ensure_group(reference, group)?;
    let full_name = required_text("full_name", full_name)?;

    let duplicate = || RecordsError::DuplicateStudent {
        group: group.to_string(),
        student: full_name.clone(),
    };

    if repositories::students::exists_in_group(pool, group, &full_name).await? {
        return Err(duplicate());
    }

    let student = repositories::students::create(pool, &full_name, group).await.map_err(
        |err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => duplicate(),
            other => RecordsError::Persistence(other),
        },
    )?;

    tracing::info!(group = %group, student = %student.full_name, "Student added to roster");
    Ok(student)
}

/// Ordered by name. An empty roster is a valid answer.
pub(crate) async fn list(
    pool: &SqlitePool,
    reference: &ReferenceData,
    group: &str,
) -> RecordsResult<Vec<Student>> {
    ensure_group(reference, group)?;
    Ok(repositories::students::list_by_group(pool, group).await?)
}

/// Roster entry the account was linked to by an administrator.
pub(crate) async fn linked_student(
    pool: &SqlitePool,
    username: &str,
) -> RecordsResult<Option<Student>> {
    Ok(repositories::students::find_linked_to_user(pool, username).await?)
}

/// Inserts the configured seed rosters; rows already present are skipped.
pub(crate) async fn seed_rosters(pool: &SqlitePool, reference: &ReferenceData) -> RecordsResult<u64> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0_u64;
    for group in reference.group_names() {
        for student in reference.seed_roster(&group) {
            if repositories::students::insert_if_absent(&mut *tx, student, &group).await? {
                inserted += 1;
            }
        }
    }
    tx.commit().await?;

    if inserted > 0 {
        tracing::info!(inserted, "Seeded student rosters from reference data");
    }
    Ok(inserted)
}
