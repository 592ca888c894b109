// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lockbox vault service.
//!
//! This crate provides the trait definitions, error types, domain types, and
//! the ETag fingerprint used throughout the Lockbox workspace.

pub mod error;
pub mod etag;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LockboxError;
pub use etag::{BlobDigest, EtagPolicy};
pub use types::{AdapterType, ETag, HealthStatus, UserId, UserRecord, VaultRecord, VaultVersion};

pub use traits::{IdentityGate, PluginAdapter, StorageAdapter, UserStore, VaultStore};
