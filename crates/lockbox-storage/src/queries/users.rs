// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account CRUD operations.

use lockbox_core::{LockboxError, UserId, UserRecord};
use rusqlite::{OptionalExtension, params};

use crate::database::Database;

/// Insert an account unless the email is already registered.
///
/// Returns `true` if a row was inserted.
pub async fn create_user_if_absent(
    db: &Database,
    email: &str,
    password_hash: &str,
) -> Result<bool, LockboxError> {
    let email = email.to_string();
    let password_hash = password_hash.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT INTO users (email, password_hash, created_at)
                 VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT(email) DO NOTHING",
                params![email, password_hash],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an account by exact email.
pub async fn get_user_by_email(
    db: &Database,
    email: &str,
) -> Result<Option<UserRecord>, LockboxError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<UserRecord>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, email, password_hash, created_at FROM users WHERE email = ?1",
                params![email],
                |row| {
                    Ok(UserRecord {
                        id: UserId(row.get(0)?),
                        email: row.get(1)?,
                        password_hash: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("users.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_and_get_user() {
        let (db, _dir) = setup_db().await;

        assert!(create_user_if_absent(&db, "a@example.com", "hash-a").await.unwrap());
        let user = get_user_by_email(&db, "a@example.com").await.unwrap().unwrap();
        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.password_hash, "hash-a");
        assert!(user.id.0 > 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_email_is_a_no_op() {
        let (db, _dir) = setup_db().await;

        assert!(create_user_if_absent(&db, "dup@example.com", "first").await.unwrap());
        assert!(!create_user_if_absent(&db, "dup@example.com", "second").await.unwrap());

        let user = get_user_by_email(&db, "dup@example.com").await.unwrap().unwrap();
        assert_eq!(user.password_hash, "first");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn distinct_users_get_distinct_ids() {
        let (db, _dir) = setup_db().await;
        create_user_if_absent(&db, "x@example.com", "h").await.unwrap();
        create_user_if_absent(&db, "y@example.com", "h").await.unwrap();

        let x = get_user_by_email(&db, "x@example.com").await.unwrap().unwrap();
        let y = get_user_by_email(&db, "y@example.com").await.unwrap().unwrap();
        assert_ne!(x.id, y.id);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_email_is_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_user_by_email(&db, "nobody@example.com").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}
