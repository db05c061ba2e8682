use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use tracing::{error, warn};

use crate::config::HasherConfig;

#[derive(Debug, thiserror::Error)]
#[error("argon2 hash_password error: {0}")]
pub struct HashError(String);

/// Argon2id password hasher shared by both flows.
///
/// Holds a dummy hash computed once at construction so that a lookup miss
/// can still pay for one verification.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    pub fn new(cfg: &HasherConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let filler: String = OsRng
            .sample_iter(&Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();
        let dummy_hash = hash_with(&argon2, &filler)?;

        Ok(Self {
            argon2,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    /// Salted PHC string; never equal across two calls with the same input.
    pub fn hash(&self, plain: &str) -> Result<String, HashError> {
        hash_with(&self.argon2, plain)
    }

    /// Checks `plain` against a stored PHC string. A stored value that does
    /// not parse is reported as a mismatch after a dummy verification.
    pub fn verify(&self, plain: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => self
                .argon2
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!(error = %e, "stored password hash is malformed");
                self.verify_dummy(plain);
                false
            }
        }
    }

    /// Runs one verification whose result is discarded.
    pub fn verify_dummy(&self, plain: &str) {
        if let Ok(parsed) = PasswordHash::new(&self.dummy_hash) {
            let _ = self.argon2.verify_password(plain.as_bytes(), &parsed);
        }
    }

    #[cfg(test)]
    pub fn fast() -> Self {
        Self::new(&HasherConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .expect("minimal argon2 params are valid")
    }
}

fn hash_with(argon2: &Argon2<'_>, plain: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            HashError(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = PasswordHasher::fast();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(password, &hash));
    }

    #[test]
    fn same_password_gets_a_fresh_salt_each_time() {
        let hasher = PasswordHasher::fast();
        let a = hasher.hash("Secret123").unwrap();
        let b = hasher.hash("Secret123").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("Secret123", &a));
        assert!(hasher.verify("Secret123", &b));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = PasswordHasher::fast();
        let hash = hasher.hash("correct-horse-battery-staple").unwrap();
        assert!(!hasher.verify("wrong-password", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn malformed_stored_hash_is_a_mismatch() {
        let hasher = PasswordHasher::fast();
        assert!(!hasher.verify("anything", "not-a-valid-hash"));
        assert!(!hasher.verify("anything", ""));
    }

    #[test]
    fn verifies_hashes_made_with_other_params() {
        let strong = PasswordHasher::new(&HasherConfig {
            memory_kib: 64,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let hash = strong.hash("Secret123").unwrap();
        assert!(PasswordHasher::fast().verify("Secret123", &hash));
    }

    #[test]
    fn rejects_invalid_params() {
        let err = PasswordHasher::new(&HasherConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(err.is_err());
    }
}
