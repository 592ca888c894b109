// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credentials for Lockbox: Argon2id password hashing and the signed-token
//! [`IdentityGate`](lockbox_core::IdentityGate) implementation.

pub mod password;
pub mod token;

pub use password::PasswordService;
pub use token::{Claims, TokenGate};
