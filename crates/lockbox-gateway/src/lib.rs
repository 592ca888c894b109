// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Lockbox vault service.
//!
//! Exposes the vault read/write endpoints behind bearer authentication, the
//! signup and login endpoints, and a public health check. All persistence and
//! credential handling is reached through the trait objects in
//! [`GatewayState`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::AuthenticatedUser;
pub use error::ApiError;
pub use server::{GatewayState, HealthState, build_router, start_server};
