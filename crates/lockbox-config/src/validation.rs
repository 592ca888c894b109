// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express.

use lockbox_core::etag::{MAX_ETAG_HEX_LEN, MIN_ETAG_HEX_LEN};

use crate::diagnostic::ConfigError;
use crate::model::LockboxConfig;

/// Token signing algorithms accepted in `auth.jwt_algorithm`.
pub const SUPPORTED_JWT_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// Shortest accepted `auth.jwt_secret`, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 16;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &LockboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "server.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.server.log_level
        )));
    }

    if config.server.max_body_bytes == 0 {
        errors.push(ConfigError::validation(
            "server.max_body_bytes must be greater than 0",
        ));
    }

    for origin in &config.server.cors_allowed_origins {
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            errors.push(ConfigError::validation(format!(
                "server.cors_allowed_origins entry `{origin}` must start with http:// or https://"
            )));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if let Some(secret) = &config.auth.jwt_secret
        && secret.len() < MIN_JWT_SECRET_LEN
    {
        errors.push(ConfigError::validation(format!(
            "auth.jwt_secret must be at least {MIN_JWT_SECRET_LEN} bytes"
        )));
    }

    if !SUPPORTED_JWT_ALGORITHMS.contains(&config.auth.jwt_algorithm.as_str()) {
        errors.push(ConfigError::validation(format!(
            "auth.jwt_algorithm must be one of {}, got `{}`",
            SUPPORTED_JWT_ALGORITHMS.join(", "),
            config.auth.jwt_algorithm
        )));
    }

    if config.auth.token_ttl_secs == 0 {
        errors.push(ConfigError::validation(
            "auth.token_ttl_secs must be greater than 0",
        ));
    }

    // argon2 crate minimum is 8 KiB per lane.
    if config.auth.argon2_memory_cost < 8 * config.auth.argon2_parallelism.max(1) {
        errors.push(ConfigError::validation(format!(
            "auth.argon2_memory_cost must be at least 8 KiB per lane, got {}",
            config.auth.argon2_memory_cost
        )));
    }

    if config.auth.argon2_iterations < 1 {
        errors.push(ConfigError::validation(
            "auth.argon2_iterations must be at least 1",
        ));
    }

    if config.auth.argon2_parallelism < 1 {
        errors.push(ConfigError::validation(
            "auth.argon2_parallelism must be at least 1",
        ));
    }

    let etag_len = config.vault.etag_hex_len;
    if !(MIN_ETAG_HEX_LEN..=MAX_ETAG_HEX_LEN).contains(&etag_len) {
        errors.push(ConfigError::validation(format!(
            "vault.etag_hex_len must be between {MIN_ETAG_HEX_LEN} (64 bits) and {MAX_ETAG_HEX_LEN}, got {etag_len}"
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &LockboxConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&LockboxConfig::default()).is_ok());
    }

    #[test]
    fn short_jwt_secret_fails() {
        let mut config = LockboxConfig::default();
        config.auth.jwt_secret = Some("short".into());
        let errs = messages(&config);
        assert!(errs.iter().any(|m| m.contains("jwt_secret")));
    }

    #[test]
    fn unsupported_algorithm_fails() {
        let mut config = LockboxConfig::default();
        config.auth.jwt_algorithm = "RS256".into();
        let errs = messages(&config);
        assert!(errs.iter().any(|m| m.contains("jwt_algorithm")));
    }

    #[test]
    fn etag_below_64_bits_fails() {
        let mut config = LockboxConfig::default();
        config.vault.etag_hex_len = 8;
        let errs = messages(&config);
        assert!(errs.iter().any(|m| m.contains("etag_hex_len")));
    }

    #[test]
    fn etag_above_digest_fails() {
        let mut config = LockboxConfig::default();
        config.vault.etag_hex_len = 65;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn bad_cors_origin_fails() {
        let mut config = LockboxConfig::default();
        config.server.cors_allowed_origins = vec!["localhost:5173".into()];
        let errs = messages(&config);
        assert!(errs.iter().any(|m| m.contains("cors_allowed_origins")));
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = LockboxConfig::default();
        config.storage.database_path = "  ".into();
        config.server.log_level = "loud".into();
        config.auth.token_ttl_secs = 0;
        let errs = messages(&config);
        assert_eq!(errs.len(), 3, "got: {errs:?}");
    }
}
