// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault reads and conditional writes.
//!
//! A write runs as one `BEGIN IMMEDIATE` transaction on the single writer
//! thread: look up the current row, check the presented ETag, and either
//! insert version 1 or issue an `UPDATE ... WHERE etag = ?` whose affected
//! row count is checked. Blob, version and etag change in one statement, so
//! a failed write leaves the row exactly as it was.
//!
//! The blob is hashed on the blocking pool before the transaction starts.
//! Only the user id and version are appended on the writer thread, so one
//! user's large upload does not stall other users' queries.

use lockbox_core::{BlobDigest, ETag, EtagPolicy, LockboxError, UserId, VaultRecord, VaultVersion};
use rusqlite::{OptionalExtension, TransactionBehavior, params};
use tracing::{debug, warn};

use crate::database::Database;

/// Result of the check-and-replace, decided inside the transaction.
enum WriteOutcome {
    Written(VaultVersion),
    /// Record exists and the caller presented no ETag.
    MissingPrecondition,
    /// Record exists and the caller's ETag is not the stored one.
    Stale,
}

/// Fetch the vault of `user_id`.
pub async fn get_vault(db: &Database, user_id: UserId) -> Result<Option<VaultRecord>, LockboxError> {
    db.connection()
        .call(move |conn| -> Result<Option<VaultRecord>, rusqlite::Error> {
            conn.query_row(
                "SELECT user_id, blob, version, etag, updated_at FROM vaults WHERE user_id = ?1",
                params![user_id.0],
                |row| {
                    Ok(VaultRecord {
                        user_id: UserId(row.get(0)?),
                        blob: row.get(1)?,
                        version: row.get(2)?,
                        etag: ETag::from(row.get::<_, String>(3)?),
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Replace the vault of `user_id` if `if_match` names its current state.
///
/// With no existing row, `if_match` is ignored and version 1 is created.
pub async fn put_vault(
    db: &Database,
    policy: EtagPolicy,
    user_id: UserId,
    blob: Vec<u8>,
    if_match: Option<String>,
) -> Result<VaultVersion, LockboxError> {
    let presented = if_match.is_some();
    let (blob, digest) = tokio::task::spawn_blocking(move || {
        let digest = BlobDigest::of(&blob);
        (blob, digest)
    })
    .await
    .map_err(|e| LockboxError::Internal(format!("blob hashing task failed: {e}")))?;

    let outcome = db
        .connection()
        .call(move |conn| -> Result<WriteOutcome, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let current: Option<(i64, String)> = tx
                .query_row(
                    "SELECT version, etag FROM vaults WHERE user_id = ?1",
                    params![user_id.0],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            let outcome = match current {
                None => {
                    let etag = policy.finish(digest, user_id, 1);
                    tx.execute(
                        "INSERT INTO vaults (user_id, blob, version, etag, updated_at)
                         VALUES (?1, ?2, 1, ?3, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
                        params![user_id.0, blob, etag.as_str()],
                    )?;
                    WriteOutcome::Written(VaultVersion { version: 1, etag })
                }
                Some((version, stored)) => match if_match {
                    None => WriteOutcome::MissingPrecondition,
                    Some(given) if given != stored => WriteOutcome::Stale,
                    Some(given) => {
                        let next = version + 1;
                        let etag = policy.finish(digest, user_id, next);
                        let changed = tx.execute(
                            "UPDATE vaults
                             SET blob = ?1, version = ?2, etag = ?3,
                                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                             WHERE user_id = ?4 AND etag = ?5 AND version = ?6",
                            params![blob, next, etag.as_str(), user_id.0, given, version],
                        )?;
                        if changed == 1 {
                            WriteOutcome::Written(VaultVersion {
                                version: next,
                                etag,
                            })
                        } else {
                            WriteOutcome::Stale
                        }
                    }
                },
            };

            match outcome {
                WriteOutcome::Written(_) => tx.commit()?,
                _ => tx.rollback()?,
            }
            Ok(outcome)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match outcome {
        WriteOutcome::Written(written) => {
            debug!(user_id = %user_id, version = written.version, "vault written");
            Ok(written)
        }
        WriteOutcome::MissingPrecondition => {
            warn!(user_id = %user_id, "vault write rejected: If-Match required");
            Err(LockboxError::Conflict(
                "vault exists; If-Match with the current ETag is required".to_string(),
            ))
        }
        WriteOutcome::Stale => {
            warn!(user_id = %user_id, presented, "vault write rejected: stale ETag");
            Err(LockboxError::Conflict("etag mismatch".to_string()))
        }
    }
}

/// Number of stored vaults.
pub async fn count_vaults(db: &Database) -> Result<i64, LockboxError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM vaults", [], |row| row.get(0))
        })
        .await
        .map_err(crate::database::map_tr_err)
}
