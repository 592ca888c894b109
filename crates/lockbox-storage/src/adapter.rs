// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage, vault, and account traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use lockbox_config::model::StorageConfig;
use lockbox_core::{
    AdapterType, EtagPolicy, HealthStatus, LockboxError, PluginAdapter, StorageAdapter, UserId,
    UserRecord, UserStore, VaultRecord, VaultStore, VaultVersion,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    etag_policy: EtagPolicy,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage. Nothing is opened until [`initialize`](StorageAdapter::initialize).
    pub fn new(config: StorageConfig, etag_policy: EtagPolicy) -> Self {
        Self {
            config,
            etag_policy,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    pub fn db(&self) -> Result<&Database, LockboxError> {
        self.db.get().ok_or_else(|| LockboxError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Number of stored vaults.
    pub async fn vault_count(&self) -> Result<i64, LockboxError> {
        queries::vaults::count_vaults(self.db()?).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LockboxError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LockboxError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), LockboxError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| LockboxError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), LockboxError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl VaultStore for SqliteStorage {
    async fn read_vault(&self, user_id: UserId) -> Result<VaultRecord, LockboxError> {
        queries::vaults::get_vault(self.db()?, user_id)
            .await?
            .ok_or_else(|| LockboxError::NotFound("no vault".to_string()))
    }

    async fn write_vault(
        &self,
        user_id: UserId,
        blob: Vec<u8>,
        if_match: Option<&str>,
    ) -> Result<VaultVersion, LockboxError> {
        queries::vaults::put_vault(
            self.db()?,
            self.etag_policy,
            user_id,
            blob,
            if_match.map(str::to_string),
        )
        .await
    }
}

#[async_trait]
impl UserStore for SqliteStorage {
    async fn create_user_if_absent(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, LockboxError> {
        queries::users::create_user_if_absent(self.db()?, email, password_hash).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, LockboxError> {
        queries::users::get_user_by_email(self.db()?, email).await
    }
}
