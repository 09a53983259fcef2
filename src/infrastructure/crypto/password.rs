//! Password hashing utilities

use std::sync::Arc;

use bcrypt::{hash, verify};

use crate::domain::{DomainError, DomainResult};

/// Default bcrypt cost factor.
pub const DEFAULT_COST: u32 = 10;

/// Longest secret bcrypt reads in full; longer input would be truncated.
pub const MAX_SECRET_BYTES: usize = 72;

/// Secret behind the dummy hash used to equalise unknown-email logins.
const DUMMY_SECRET: &str = "credauth-timing-equaliser";

/// Salted, adaptive one-way hashing of credential secrets (bcrypt).
///
/// Cloning is cheap and clones share nothing mutable, so a hasher can be used
/// from any number of concurrent tasks.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Create a hasher with the given cost. Fails when bcrypt rejects the cost.
    pub fn new(cost: u32) -> DomainResult<Self> {
        let dummy_hash = hash(DUMMY_SECRET, cost).map_err(DomainError::internal)?;
        Ok(Self {
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a secret with a fresh random salt.
    ///
    /// Secrets over [`MAX_SECRET_BYTES`] are refused rather than truncated.
    pub fn hash(&self, secret: &str) -> DomainResult<String> {
        if secret.len() > MAX_SECRET_BYTES {
            return Err(DomainError::SecretTooLong);
        }
        hash(secret, self.cost).map_err(DomainError::internal)
    }

    /// Verify a secret against a stored hash.
    ///
    /// Uses the salt and cost embedded in `hashed`; the digest comparison is
    /// done by bcrypt in constant time. Malformed hashes verify as `false`,
    /// and so do secrets too long to have been hashed.
    pub fn verify(&self, secret: &str, hashed: &str) -> bool {
        if secret.len() > MAX_SECRET_BYTES {
            self.verify_dummy(secret);
            return false;
        }
        verify(secret, hashed).unwrap_or(false)
    }

    /// Spend one verification's worth of work without a real hash.
    pub fn verify_dummy(&self, secret: &str) {
        let secret = secret.as_bytes();
        let secret = &secret[..secret.len().min(MAX_SECRET_BYTES)];
        let _ = verify(secret, &*self.dummy_hash);
    }
}
