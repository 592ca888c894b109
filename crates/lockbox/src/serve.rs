// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox serve` command implementation.
//!
//! Opens storage, builds the identity gate and password hasher, and runs the
//! HTTP server until SIGTERM or Ctrl+C.

use std::sync::Arc;

use lockbox_auth::{PasswordService, TokenGate};
use lockbox_config::LockboxConfig;
use lockbox_core::{EtagPolicy, LockboxError, PluginAdapter, StorageAdapter};
use lockbox_gateway::{GatewayState, HealthState, start_server};
use lockbox_storage::SqliteStorage;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the `lockbox serve` command.
pub async fn run_serve(config: LockboxConfig) -> Result<(), LockboxError> {
    init_tracing(&config.server.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting lockbox"
    );

    let (state, storage) = build_state(&config).await?;
    let cancel = shutdown::shutdown_token();

    let result = start_server(&config.server, state, cancel).await;

    if let Err(e) = storage.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }
    info!("lockbox stopped");
    result
}

/// Open storage and assemble the shared handler state.
///
/// Fails before touching the database if no token secret is configured.
async fn build_state(
    config: &LockboxConfig,
) -> Result<(GatewayState, Arc<SqliteStorage>), LockboxError> {
    let identity = Arc::new(TokenGate::from_config(&config.auth)?);
    let passwords = PasswordService::from_config(&config.auth)?;
    let etag_policy = EtagPolicy::new(config.vault.etag_hex_len)?;

    let storage = Arc::new(SqliteStorage::new(config.storage.clone(), etag_policy));
    storage.initialize().await?;
    info!(
        path = %config.storage.database_path,
        wal = config.storage.wal_mode,
        "storage ready"
    );

    let state = GatewayState {
        vaults: storage.clone(),
        users: storage.clone(),
        identity,
        passwords,
        health: HealthState {
            start_time: std::time::Instant::now(),
            storage: storage.clone(),
        },
    };
    Ok((state, storage))
}

/// Initialize tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lockbox={log_level},warn")));

    // try_init: a subscriber may already be installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
