//! One-way credential hashing for stored secrets.
//!
//! Hashes are produced in PHC string format, so parameters and salt travel
//! with the hash and verification needs no extra configuration.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Errors surfaced by [`PasswordEncoder`].
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash credential: {0}")]
    Hash(String),
    #[error("stored hash is not a valid PHC string: {0}")]
    MalformedHash(String),
}

/// Credential encoder backed by Argon2id with the library defaults.
#[derive(Default)]
pub struct PasswordEncoder {
    argon2: Argon2<'static>,
}

impl PasswordEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a raw credential with a fresh random salt.
    ///
    /// # Errors
    /// Returns [`PasswordError::Hash`] if the underlying hasher rejects the
    /// input.
    pub fn encode(&self, raw: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a raw credential against a stored PHC-format hash.
    ///
    /// An empty stored hash never matches; a syntactically broken one is an
    /// error rather than a silent mismatch.
    ///
    /// # Errors
    /// Returns [`PasswordError::MalformedHash`] if `encoded` is not a valid
    /// PHC string.
    pub fn matches(&self, raw: &str, encoded: &str) -> Result<bool, PasswordError> {
        if encoded.is_empty() {
            tracing::warn!("empty encoded credential");
            return Ok(false);
        }

        let parsed =
            PasswordHash::new(encoded).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        match self.argon2.verify_password(raw.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn encode_then_matches() {
        let encoder = PasswordEncoder::new();
        let hash = encoder.encode("hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(encoder.matches("hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_credential_does_not_match() {
        let encoder = PasswordEncoder::new();
        let hash = encoder.encode("hunter2").unwrap();
        assert!(!encoder.matches("hunter3", &hash).unwrap());
    }

    #[test]
    fn empty_stored_hash_never_matches() {
        let encoder = PasswordEncoder::new();
        assert!(!encoder.matches("anything", "").unwrap());
    }

    #[test]
    fn garbage_stored_hash_is_an_error() {
        let encoder = PasswordEncoder::new();
        assert!(matches!(
            encoder.matches("anything", "not-a-phc-string"),
            Err(PasswordError::MalformedHash(_))
        ));
    }

    #[test]
    fn salts_differ_between_encodes() {
        let encoder = PasswordEncoder::new();
        let a = encoder.encode("same-input").unwrap();
        let b = encoder.encode("same-input").unwrap();
        assert_ne!(a, b);
    }
}
