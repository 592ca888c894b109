// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` builds the complete HTTP stack (SQLite storage, Argon2id
//! hashing, signed tokens, axum router) over a temp directory. Requests go
//! through `tower::ServiceExt::oneshot`, so tests exercise the same
//! middleware and handlers as a running server.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use lockbox_auth::{PasswordService, TokenGate};
use lockbox_config::LockboxConfig;
use lockbox_core::{EtagPolicy, LockboxError, StorageAdapter};
use lockbox_gateway::{GatewayState, HealthState, build_router};
use lockbox_storage::SqliteStorage;
use tower::ServiceExt;

/// Signing secret used by every harness.
pub const TEST_JWT_SECRET: &str = "lockbox-test-secret-not-for-production";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    token_ttl_secs: u64,
    etag_hex_len: usize,
    max_body_bytes: Option<usize>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            token_ttl_secs: 3600,
            etag_hex_len: lockbox_core::etag::DEFAULT_ETAG_HEX_LEN,
            max_body_bytes: None,
        }
    }

    /// Lifetime of tokens issued by the harness.
    pub fn with_token_ttl(mut self, secs: u64) -> Self {
        self.token_ttl_secs = secs;
        self
    }

    /// ETag digest length in hex characters.
    pub fn with_etag_hex_len(mut self, len: usize) -> Self {
        self.etag_hex_len = len;
        self
    }

    /// Request body limit in bytes.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = Some(bytes);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, LockboxError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| LockboxError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = LockboxConfig::default();
        config.storage.database_path = db_path.to_string_lossy().to_string();
        config.auth.jwt_secret = Some(TEST_JWT_SECRET.to_string());
        config.auth.token_ttl_secs = self.token_ttl_secs;
        // Use low cost for fast tests.
        config.auth.argon2_memory_cost = 1024;
        config.auth.argon2_iterations = 1;
        config.vault.etag_hex_len = self.etag_hex_len;
        if let Some(bytes) = self.max_body_bytes {
            config.server.max_body_bytes = bytes;
        }

        let storage = Arc::new(SqliteStorage::new(
            config.storage.clone(),
            EtagPolicy::new(config.vault.etag_hex_len)?,
        ));
        storage.initialize().await?;

        let gate = Arc::new(TokenGate::from_config(&config.auth)?);
        let state = GatewayState {
            vaults: storage.clone(),
            users: storage.clone(),
            identity: gate.clone(),
            passwords: PasswordService::from_config(&config.auth)?,
            health: HealthState {
                start_time: std::time::Instant::now(),
                storage: storage.clone(),
            },
        };
        let router = build_router(&config.server, state)?;

        Ok(TestHarness {
            router,
            storage,
            gate,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A buffered HTTP response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// The `ETag` header, if present.
    pub fn etag(&self) -> Option<String> {
        self.headers
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// The body parsed as JSON, or `Null` if it is not JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// In-process Lockbox server over a temp database.
pub struct TestHarness {
    router: Router,
    /// Storage backing the router, for direct inspection.
    pub storage: Arc<SqliteStorage>,
    /// Token gate shared with the router, for minting custom tokens.
    pub gate: Arc<TokenGate>,
    /// Effective configuration.
    pub config: LockboxConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Build a harness with default options.
    pub async fn new() -> Result<Self, LockboxError> {
        Self::builder().build().await
    }

    /// Send a request through the full router.
    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse, LockboxError> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| LockboxError::Internal(format!("router error: {e}")))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| LockboxError::Internal(format!("failed to read body: {e}")))?;
        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Result<Request<Body>, LockboxError> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .map_err(|e| LockboxError::Internal(e.to_string()))
    }

    /// POST /api/auth/signup.
    pub async fn signup(&self, email: &str, password: &str) -> Result<TestResponse, LockboxError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(Self::json_request("/api/auth/signup", body)?).await
    }

    /// POST /api/auth/login.
    pub async fn login(&self, email: &str, password: &str) -> Result<TestResponse, LockboxError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(Self::json_request("/api/auth/login", body)?).await
    }

    /// Sign up and log in, returning the bearer token.
    pub async fn signup_and_login(&self, email: &str, password: &str) -> Result<String, LockboxError> {
        self.signup(email, password).await?;
        let response = self.login(email, password).await?;
        response.json()["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LockboxError::Internal(format!("login failed: {}", response.status)))
    }

    /// GET /api/vault with `token`.
    pub async fn get_vault(&self, token: &str) -> Result<TestResponse, LockboxError> {
        let request = Request::get("/api/vault")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .map_err(|e| LockboxError::Internal(e.to_string()))?;
        self.send(request).await
    }

    /// PUT /api/vault with `token`, `blob`, and an optional `If-Match`.
    pub async fn put_vault(
        &self,
        token: &str,
        blob: impl Into<Vec<u8>>,
        if_match: Option<&str>,
    ) -> Result<TestResponse, LockboxError> {
        let mut builder = Request::put("/api/vault")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/octet-stream");
        if let Some(etag) = if_match {
            builder = builder.header(header::IF_MATCH, etag);
        }
        let request = builder
            .body(Body::from(blob.into()))
            .map_err(|e| LockboxError::Internal(e.to_string()))?;
        self.send(request).await
    }
}
