// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity gate trait: bearer credential to user id.

use async_trait::async_trait;

use crate::error::LockboxError;
use crate::traits::adapter::PluginAdapter;
use crate::types::UserId;

/// Verifies bearer credentials and mints new ones.
#[async_trait]
pub trait IdentityGate: PluginAdapter {
    /// Resolves a bearer credential to the user it was issued for.
    ///
    /// Fails with [`LockboxError::Unauthorized`] for missing, malformed,
    /// expired, or wrongly-signed credentials.
    async fn resolve_user(&self, credential: &str) -> Result<UserId, LockboxError>;

    /// Issues a fresh bearer credential for `user_id`.
    async fn issue_token(&self, user_id: UserId) -> Result<String, LockboxError>;
}
