// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Lockbox service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable identifier of an account. Assigned by the datastore on signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(UserId)
    }
}

/// Opaque fingerprint of one exact vault state, rendered as a weak validator
/// (`W/"<hex>"`).
///
/// Compared by plain string equality against the `If-Match` a client presents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ETag(String);

impl ETag {
    /// Returns the header value form of this ETag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `presented` is exactly this ETag.
    pub fn matches(&self, presented: &str) -> bool {
        self.0 == presented
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ETag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single persisted vault of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultRecord {
    pub user_id: UserId,
    /// Client-encrypted bytes. Never inspected by the server.
    pub blob: Vec<u8>,
    /// Starts at 1 and grows by exactly 1 per accepted write.
    pub version: i64,
    pub etag: ETag,
    /// ISO 8601 timestamp of the last accepted write.
    pub updated_at: String,
}

/// Version and ETag produced by an accepted write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultVersion {
    pub version: i64,
    pub etag: ETag,
}

/// A registered account.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_at: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[redacted]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Identity,
}
