// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer authentication middleware.
//!
//! Resolves `Authorization: Bearer <token>` through the configured
//! [`IdentityGate`] and stores the caller's [`UserId`] in the request
//! extensions as [`AuthenticatedUser`]. Requests without a valid credential
//! never reach the handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use lockbox_core::{IdentityGate, LockboxError, UserId};

use crate::error::ApiError;

/// The user a request was authenticated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

/// Extract the credential from an `Authorization` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credential) = value.trim().split_once(' ')?;
    let credential = credential.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !credential.is_empty()).then_some(credential)
}

/// Middleware that rejects requests without a valid bearer token.
pub async fn auth_middleware(
    State(identity): State<Arc<dyn IdentityGate>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Owned: the request body is not Sync, so no borrow of it may cross an await.
    let credential = bearer_credential(request.headers())
        .map(str::to_string)
        .ok_or_else(|| LockboxError::Unauthorized("missing token".into()))?;
    let user_id = identity.resolve_user(&credential).await?;

    tracing::debug!(user_id = %user_id, "request authenticated");
    request.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(request).await)
}
