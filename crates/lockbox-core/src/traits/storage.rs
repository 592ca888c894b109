// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter lifecycle trait.

use async_trait::async_trait;

use crate::error::LockboxError;
use crate::traits::adapter::PluginAdapter;

/// Lifecycle of a persistence backend.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), LockboxError>;

    /// Flushes pending writes to durable storage.
    ///
    /// The connection stays open until the adapter is dropped, so late
    /// requests during shutdown still complete.
    async fn close(&self) -> Result<(), LockboxError>;
}
