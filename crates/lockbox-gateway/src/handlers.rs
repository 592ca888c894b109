// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles GET/PUT /api/vault, POST /api/auth/signup, POST /api/auth/login,
//! and the public GET /health.

use std::sync::LazyLock;

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use lockbox_core::{HealthStatus, LockboxError};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::server::GatewayState;

/// Minimal `local@domain.tld` shape check.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Request body for signup and login.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    /// Account email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Response body for POST /api/auth/signup.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub ok: bool,
}

/// Response body for POST /api/auth/login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for the vault endpoints.
    pub token: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
}

/// Unwrap a JSON body and check the email shape.
fn parse_credentials(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<CredentialsRequest, ApiError> {
    let Json(mut body) =
        payload.map_err(|rejection| LockboxError::InvalidInput(rejection.body_text()))?;
    body.email = body.email.trim().to_string();
    if !EMAIL_RE.is_match(&body.email) {
        return Err(LockboxError::InvalidInput("invalid email address".into()).into());
    }
    Ok(body)
}

fn etag_header(etag: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(etag)
        .map_err(|e| ApiError(LockboxError::Internal(format!("unrepresentable ETag: {e}"))))
}

/// GET /api/vault
///
/// Returns the caller's vault blob with its ETag.
pub async fn get_vault(
    State(state): State<GatewayState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> Result<Response, ApiError> {
    let record = state.vaults.read_vault(user_id).await?;
    tracing::debug!(user_id = %user_id, version = record.version, "vault read");

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::ETAG, etag_header(record.etag.as_str())?),
        ],
        record.blob,
    )
        .into_response())
}

/// PUT /api/vault
///
/// Replaces the caller's vault. An existing vault is only replaced when
/// `If-Match` carries its current ETag.
pub async fn put_vault(
    State(state): State<GatewayState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    // A non-ASCII If-Match can never equal a stored ETag; keep it so the
    // write is rejected rather than treated as unconditional.
    let if_match = headers
        .get(header::IF_MATCH)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let written = state
        .vaults
        .write_vault(user_id, body.to_vec(), if_match.as_deref())
        .await?;

    Ok((
        StatusCode::OK,
        [(header::ETAG, etag_header(written.etag.as_str())?)],
    )
        .into_response())
}

/// POST /api/auth/signup
///
/// Registers an account. Always answers `{"ok": true}`, whether or not the
/// email was already registered.
pub async fn signup(
    State(state): State<GatewayState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, ApiError> {
    let body = parse_credentials(payload)?;

    // Hash unconditionally so a registered email costs the same as a new one.
    let hash = state.passwords.hash(body.password).await?;
    if state.users.create_user_if_absent(&body.email, &hash).await? {
        tracing::info!("account created");
    }

    Ok(Json(SignupResponse { ok: true }))
}

/// POST /api/auth/login
///
/// Exchanges email and password for a bearer token.
pub async fn login(
    State(state): State<GatewayState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let body = parse_credentials(payload)?;

    let user = state.users.find_user_by_email(&body.email).await?;
    let stored = user.as_ref().map(|u| u.password_hash.clone());
    let verified = state.passwords.verify(body.password, stored).await?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::debug!("login rejected");
            return Err(LockboxError::Unauthorized("invalid credentials".into()).into());
        }
    };

    let token = state.identity.issue_token(user.id).await?;
    Ok(Json(LoginResponse { token }))
}

/// GET /health
///
/// Unauthenticated liveness check backed by the storage health check.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let uptime_secs = state.health.start_time.elapsed().as_secs();
    let healthy = matches!(
        state.health.storage.health_check().await,
        Ok(HealthStatus::Healthy)
    );

    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs,
        }),
    )
        .into_response()
}
