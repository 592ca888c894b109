// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic vault fingerprints.
//!
//! `fingerprint = W/"hex(SHA-256(blob || decimal(user_id) || decimal(version)))[..len]"`
//!
//! ETag equality is the only gate on conditional writes, so the truncation
//! length bounds collision resistance. It is configurable but never below
//! 64 bits.
//!
//! The blob comes first in the digest input, so the expensive part can be
//! hashed up front with [`BlobDigest::of`] and the version appended later
//! with [`EtagPolicy::finish`], once the next version is known.

use sha2::{Digest, Sha256};

use crate::error::LockboxError;
use crate::types::{ETag, UserId};

/// Default truncation: 16 hex characters (64 bits).
pub const DEFAULT_ETAG_HEX_LEN: usize = 16;

/// Smallest accepted truncation (64 bits).
pub const MIN_ETAG_HEX_LEN: usize = 16;

/// Full SHA-256 digest in hex.
pub const MAX_ETAG_HEX_LEN: usize = 64;

/// SHA-256 state after absorbing a vault blob, before the user id and version.
#[derive(Clone)]
pub struct BlobDigest(Sha256);

impl BlobDigest {
    /// Hash `blob`. Linear in its length; run it off the database thread.
    pub fn of(blob: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(blob);
        Self(hasher)
    }
}

impl std::fmt::Debug for BlobDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobDigest").finish_non_exhaustive()
    }
}

/// Computes vault ETags with a fixed truncation length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtagPolicy {
    hex_len: usize,
}

impl EtagPolicy {
    /// Create a policy truncating digests to `hex_len` hex characters.
    pub fn new(hex_len: usize) -> Result<Self, LockboxError> {
        if !(MIN_ETAG_HEX_LEN..=MAX_ETAG_HEX_LEN).contains(&hex_len) {
            return Err(LockboxError::Config(format!(
                "etag length must be between {MIN_ETAG_HEX_LEN} and {MAX_ETAG_HEX_LEN} hex characters, got {hex_len}"
            )));
        }
        Ok(Self { hex_len })
    }

    pub fn hex_len(&self) -> usize {
        self.hex_len
    }

    /// Fingerprint one vault state. Pure: identical inputs give identical ETags.
    pub fn fingerprint(&self, user_id: UserId, version: i64, blob: &[u8]) -> ETag {
        self.finish(BlobDigest::of(blob), user_id, version)
    }

    /// Complete a fingerprint from a pre-hashed blob.
    pub fn finish(&self, digest: BlobDigest, user_id: UserId, version: i64) -> ETag {
        let BlobDigest(mut hasher) = digest;
        hasher.update(user_id.to_string().as_bytes());
        hasher.update(version.to_string().as_bytes());
        let digest = hex::encode(hasher.finalize());
        ETag::from(format!("W/\"{}\"", &digest[..self.hex_len]))
    }
}

impl Default for EtagPolicy {
    fn default() -> Self {
        Self {
            hex_len: DEFAULT_ETAG_HEX_LEN,
        }
    }
}
