// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod identity;
pub mod storage;
pub mod user;
pub mod vault;

pub use adapter::PluginAdapter;
pub use identity::IdentityGate;
pub use storage::StorageAdapter;
pub use user::UserStore;
pub use vault::VaultStore;
