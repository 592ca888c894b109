// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Lockbox integration tests.
//!
//! [`TestHarness`] assembles the real router over a temp SQLite database
//! with cheap Argon2 parameters, and drives it in-process without binding a
//! socket.

pub mod harness;

pub use harness::{TEST_JWT_SECRET, TestHarness, TestHarnessBuilder, TestResponse};
