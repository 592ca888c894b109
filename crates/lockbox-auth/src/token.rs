// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signed bearer tokens.
//!
//! Tokens are HMAC-signed JWTs carrying the decimal user id in `sub`. There
//! is no server-side session table: a token is valid until its `exp`.

use std::str::FromStr;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lockbox_config::model::AuthConfig;
use lockbox_core::{AdapterType, HealthStatus, IdentityGate, LockboxError, PluginAdapter, UserId};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Decimal user id.
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id` issued at `now` and valid for `ttl_secs`.
    pub fn new(user_id: UserId, now: i64, ttl_secs: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(ttl_secs),
        }
    }
}

/// Identity gate backed by HMAC-signed JWTs.
pub struct TokenGate {
    algorithm: Algorithm,
    ttl_secs: i64,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGate")
            .field("algorithm", &self.algorithm)
            .field("ttl_secs", &self.ttl_secs)
            .field("secret", &"[redacted]")
            .finish()
    }
}

impl TokenGate {
    /// Create a gate signing with `secret` under an HMAC `algorithm`.
    pub fn new(
        secret: &SecretString,
        algorithm: Algorithm,
        ttl_secs: u64,
    ) -> Result<Self, LockboxError> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(LockboxError::Config(format!(
                "unsupported token algorithm {algorithm:?}; expected HS256, HS384 or HS512"
            )));
        }
        let ttl_secs = i64::try_from(ttl_secs)
            .map_err(|_| LockboxError::Config("token_ttl_secs is out of range".to_string()))?;

        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            algorithm,
            ttl_secs,
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        })
    }

    /// Create a gate from the `[auth]` section. Fails if no secret is set.
    pub fn from_config(config: &AuthConfig) -> Result<Self, LockboxError> {
        let secret = config.jwt_secret.clone().ok_or_else(|| {
            LockboxError::Config(
                "auth.jwt_secret is not set (config file or LOCKBOX_AUTH_JWT_SECRET)".to_string(),
            )
        })?;
        let algorithm = Algorithm::from_str(&config.jwt_algorithm).map_err(|_| {
            LockboxError::Config(format!(
                "unknown token algorithm '{}'",
                config.jwt_algorithm
            ))
        })?;
        Self::new(&SecretString::from(secret), algorithm, config.token_ttl_secs)
    }

    /// Sign arbitrary claims with this gate's key.
    pub fn encode(&self, claims: &Claims) -> Result<String, LockboxError> {
        jsonwebtoken::encode(&Header::new(self.algorithm), claims, &self.encoding)
            .map_err(|e| LockboxError::Auth(format!("token signing failed: {e}")))
    }

    /// Verify a token's signature and expiry and return its claims.
    pub fn decode(&self, token: &str) -> Result<Claims, LockboxError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => LockboxError::Unauthorized("token expired".into()),
                _ => {
                    debug!(error = %e, "token rejected");
                    LockboxError::Unauthorized("invalid token".into())
                }
            })
    }
}

#[async_trait]
impl PluginAdapter for TokenGate {
    fn name(&self) -> &str {
        "jwt"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, LockboxError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LockboxError> {
        Ok(())
    }
}

#[async_trait]
impl IdentityGate for TokenGate {
    async fn resolve_user(&self, credential: &str) -> Result<UserId, LockboxError> {
        let claims = self.decode(credential)?;
        claims
            .sub
            .parse::<UserId>()
            .map_err(|_| LockboxError::Unauthorized("invalid token subject".into()))
    }

    async fn issue_token(&self, user_id: UserId) -> Result<String, LockboxError> {
        let now = chrono::Utc::now().timestamp();
        self.encode(&Claims::new(user_id, now, self.ttl_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-0123456789abcdef";

    fn gate() -> TokenGate {
        TokenGate::new(&SecretString::from(SECRET.to_string()), Algorithm::HS256, 3600).unwrap()
    }

    #[tokio::test]
    async fn issued_token_resolves_to_user() {
        let gate = gate();
        let token = gate.issue_token(UserId(42)).await.unwrap();
        assert_eq!(gate.resolve_user(&token).await.unwrap(), UserId(42));
    }

    #[tokio::test]
    async fn issued_claims_carry_ttl() {
        let gate = gate();
        let token = gate.issue_token(UserId(7)).await.unwrap();
        let claims = gate.decode(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let gate = gate();
        let now = chrono::Utc::now().timestamp();
        let token = gate
            .encode(&Claims::new(UserId(1), now - 7200, 3600))
            .unwrap();
        let err = gate.resolve_user(&token).await.unwrap_err();
        assert!(matches!(err, LockboxError::Unauthorized(ref m) if m == "token expired"));
    }

    #[tokio::test]
    async fn tampered_token_is_unauthorized() {
        let gate = gate();
        let token = gate.issue_token(UserId(1)).await.unwrap();
        let mut tampered = token.into_bytes();
        let idx = tampered.len() - 5;
        tampered[idx] = if tampered[idx] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(matches!(
            gate.resolve_user(&tampered).await,
            Err(LockboxError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn token_from_other_secret_is_unauthorized() {
        let other = TokenGate::new(
            &SecretString::from("another-secret-fedcba9876543210".to_string()),
            Algorithm::HS256,
            3600,
        )
        .unwrap();
        let token = other.issue_token(UserId(1)).await.unwrap();
        assert!(matches!(
            gate().resolve_user(&token).await,
            Err(LockboxError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn garbage_and_non_numeric_subject_are_unauthorized() {
        let gate = gate();
        assert!(gate.resolve_user("not.a.jwt").await.is_err());
        assert!(gate.resolve_user("").await.is_err());

        let now = chrono::Utc::now().timestamp();
        let token = gate
            .encode(&Claims {
                sub: "alice".into(),
                iat: now,
                exp: now + 60,
            })
            .unwrap();
        assert!(matches!(
            gate.resolve_user(&token).await,
            Err(LockboxError::Unauthorized(ref m)) if m == "invalid token subject"
        ));
    }

    #[tokio::test]
    async fn algorithm_is_pinned() {
        let hs512 =
            TokenGate::new(&SecretString::from(SECRET.to_string()), Algorithm::HS512, 3600).unwrap();
        let token = hs512.issue_token(UserId(1)).await.unwrap();
        assert!(gate().resolve_user(&token).await.is_err());
    }

    #[test]
    fn asymmetric_algorithms_are_rejected() {
        assert!(matches!(
            TokenGate::new(&SecretString::from(SECRET.to_string()), Algorithm::RS256, 60),
            Err(LockboxError::Config(_))
        ));
    }

    #[test]
    fn from_config_requires_secret() {
        assert!(matches!(
            TokenGate::from_config(&AuthConfig::default()),
            Err(LockboxError::Config(_))
        ));

        let config = AuthConfig {
            jwt_secret: Some(SECRET.into()),
            jwt_algorithm: "HS384".into(),
            ..AuthConfig::default()
        };
        let gate = TokenGate::from_config(&config).unwrap();
        assert_eq!(gate.algorithm, Algorithm::HS384);
        assert_eq!(gate.ttl_secs, 604_800);
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?}", gate());
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn adapter_identity() {
        let gate = gate();
        assert_eq!(gate.name(), "jwt");
        assert_eq!(gate.adapter_type(), AdapterType::Identity);
    }
}
