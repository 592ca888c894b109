// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP mapping for [`LockboxError`].

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use lockbox_core::LockboxError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// A [`LockboxError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub LockboxError);

impl From<LockboxError> for ApiError {
    fn from(err: LockboxError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LockboxError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LockboxError::NotFound(_) => StatusCode::NOT_FOUND,
            LockboxError::Conflict(_) => StatusCode::CONFLICT,
            LockboxError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.0 {
            LockboxError::Unauthorized(m)
            | LockboxError::NotFound(m)
            | LockboxError::Conflict(m)
            | LockboxError::InvalidInput(m) => m,
            other => {
                tracing::error!(error = %other, "request failed");
                "internal server error".to_string()
            }
        };

        let mut response = (status, Json(ErrorResponse { error: message })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
