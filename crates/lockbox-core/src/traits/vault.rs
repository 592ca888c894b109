// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The vault store: one opaque blob per user with conditional replacement.

use async_trait::async_trait;

use crate::error::LockboxError;
use crate::types::{UserId, VaultRecord, VaultVersion};

/// Optimistic-concurrency store for per-user vault blobs.
///
/// Implementations must consult the authoritative datastore on every call
/// and must run the check-and-replace of [`write_vault`](Self::write_vault)
/// atomically per user.
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Returns the current vault of `user_id`.
    ///
    /// Fails with [`LockboxError::NotFound`] if the user has never written one.
    async fn read_vault(&self, user_id: UserId) -> Result<VaultRecord, LockboxError>;

    /// Replaces the vault of `user_id` with `blob`.
    ///
    /// With no existing record the write is unconditional and creates
    /// version 1. Otherwise `if_match` must equal the stored ETag exactly, or
    /// the call fails with [`LockboxError::Conflict`] and nothing changes.
    async fn write_vault(
        &self,
        user_id: UserId,
        blob: Vec<u8>,
        if_match: Option<&str>,
    ) -> Result<VaultVersion, LockboxError>;
}
