// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lockbox vault service.

use thiserror::Error;

/// The primary error type used across all Lockbox adapter traits and core operations.
///
/// The first four variants are part of the client-facing protocol and map to
/// distinct HTTP statuses; everything else is an opaque server failure.
#[derive(Debug, Error)]
pub enum LockboxError {
    /// Missing, malformed, expired, or wrongly-signed credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A conditional write was rejected because the presented ETag is not current.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Request payload failed validation (bad email, malformed JSON, etc.).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors (invalid TOML, missing required fields, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Password hashing or token signing failures.
    #[error("auth error: {0}")]
    Auth(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LockboxError {
    /// Returns `true` for errors caused by the client rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_) | Self::NotFound(_) | Self::Conflict(_) | Self::InvalidInput(_)
        )
    }
}
