// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...`) so the parameters travel
//! with each stored hash. All hashing runs on the blocking thread pool.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use lockbox_config::model::AuthConfig;
use lockbox_core::LockboxError;

/// Argon2id hasher configured from `[auth]`.
#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
}

impl PasswordService {
    /// Build a hasher with explicit Argon2id cost parameters.
    pub fn new(memory_cost: u32, iterations: u32, parallelism: u32) -> Result<Self, LockboxError> {
        let params = Params::new(memory_cost, iterations, parallelism, None)
            .map_err(|e| LockboxError::Config(format!("invalid Argon2id parameters: {e}")))?;
        Ok(Self { params })
    }

    /// Build a hasher from the auth configuration section.
    pub fn from_config(config: &AuthConfig) -> Result<Self, LockboxError> {
        Self::new(
            config.argon2_memory_cost,
            config.argon2_iterations,
            config.argon2_parallelism,
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random salt.
    pub async fn hash(&self, password: String) -> Result<String, LockboxError> {
        let argon2 = self.argon2();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut rand::rngs::OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| LockboxError::Auth(format!("password hashing failed: {e}")))
        })
        .await
        .map_err(|e| LockboxError::Internal(format!("hashing task failed: {e}")))?
    }

    /// Check `password` against a stored PHC hash.
    ///
    /// With no stored hash the password is still hashed once and `false` is
    /// returned, so unknown accounts cost the same as wrong passwords.
    pub async fn verify(
        &self,
        password: String,
        stored: Option<String>,
    ) -> Result<bool, LockboxError> {
        let argon2 = self.argon2();
        tokio::task::spawn_blocking(move || match stored {
            Some(stored) => {
                let parsed = PasswordHash::new(&stored)
                    .map_err(|e| LockboxError::Auth(format!("stored hash is malformed: {e}")))?;
                Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
            }
            None => {
                let salt = SaltString::generate(&mut rand::rngs::OsRng);
                let _ = argon2.hash_password(password.as_bytes(), &salt);
                Ok(false)
            }
        })
        .await
        .map_err(|e| LockboxError::Internal(format!("hashing task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Use low cost for fast tests.
    fn service() -> PasswordService {
        PasswordService::new(1024, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn hash_is_argon2id_phc() {
        let hash = service().hash("hunter22".into()).await.unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let svc = service();
        let a = svc.hash("same".into()).await.unwrap();
        let b = svc.hash("same".into()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn verify_accepts_correct_password() {
        let svc = service();
        let hash = svc.hash("correct horse".into()).await.unwrap();
        assert!(svc.verify("correct horse".into(), Some(hash)).await.unwrap());
    }

    #[tokio::test]
    async fn verify_rejects_wrong_password() {
        let svc = service();
        let hash = svc.hash("correct horse".into()).await.unwrap();
        assert!(!svc.verify("battery staple".into(), Some(hash)).await.unwrap());
    }

    #[tokio::test]
    async fn verify_without_stored_hash_is_false() {
        assert!(!service().verify("anything".into(), None).await.unwrap());
    }

    #[tokio::test]
    async fn verify_reports_malformed_hash() {
        let result = service()
            .verify("pw".into(), Some("not-a-phc-string".into()))
            .await;
        assert!(matches!(result, Err(LockboxError::Auth(_))));
    }

    #[tokio::test]
    async fn hash_from_other_params_still_verifies() {
        let strong = PasswordService::new(2048, 2, 1).unwrap();
        let hash = strong.hash("pw".into()).await.unwrap();
        assert!(service().verify("pw".into(), Some(hash)).await.unwrap());
    }

    #[test]
    fn invalid_params_are_config_errors() {
        assert!(matches!(
            PasswordService::new(1, 0, 0),
            Err(LockboxError::Config(_))
        ));
    }

    #[test]
    fn from_config_uses_defaults() {
        let svc = PasswordService::from_config(&AuthConfig::default()).unwrap();
        assert_eq!(svc.params.m_cost(), 19456);
        assert_eq!(svc.params.t_cost(), 2);
        assert_eq!(svc.params.p_cost(), 1);
    }
}
