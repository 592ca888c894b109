// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account persistence.

use async_trait::async_trait;

use crate::error::LockboxError;
use crate::types::UserRecord;

/// Persistence for registered accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts an account unless one with `email` already exists.
    ///
    /// Returns `true` if a new account was created. An existing account is
    /// left untouched.
    async fn create_user_if_absent(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, LockboxError>;

    /// Looks up an account by exact email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, LockboxError>;
}
