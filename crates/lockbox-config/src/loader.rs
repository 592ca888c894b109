// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./lockbox.toml` > `~/.config/lockbox/lockbox.toml` > `/etc/lockbox/lockbox.toml`
//! with environment variable overrides via the `LOCKBOX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LockboxConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/lockbox/lockbox.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "lockbox.toml";

/// Config files consulted by [`load_config`], lowest priority first.
pub fn config_file_hierarchy() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("lockbox").join("lockbox.toml"));
    }
    paths.push(PathBuf::from(LOCAL_CONFIG_PATH));
    paths
}

/// Build the layered Figment.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lockbox/lockbox.toml`
/// 3. `~/.config/lockbox/lockbox.toml`
/// 4. `./lockbox.toml`
/// 5. `LOCKBOX_*` environment variables
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(LockboxConfig::default()));
    for path in config_file_hierarchy() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<LockboxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an explicit file, skipping the XDG lookup.
///
/// Environment variables still override file values.
pub fn load_config_from_path(path: &Path) -> Result<LockboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LockboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Map `LOCKBOX_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after a known section name is a separator, so
/// `LOCKBOX_AUTH_JWT_SECRET` becomes `auth.jwt_secret`.
fn env_provider() -> Env {
    Env::prefixed("LOCKBOX_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        for section in ["server", "storage", "auth", "vault"] {
            if let Some(rest) = key_str.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.into()
    })
}
