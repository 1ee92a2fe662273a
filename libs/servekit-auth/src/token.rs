//! Bearer-token validation against the process-wide signing secret.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};

use crate::claims::Claims;
use crate::errors::AuthError;

/// Process-wide signing material, loaded once at startup and shared
/// read-only across all validation calls.
#[derive(Debug, Clone)]
pub struct SigningConfig {
    secret_key: SecretString,
}

impl SigningConfig {
    pub fn new(secret_key: impl Into<SecretString>) -> Self {
        Self {
            secret_key: secret_key.into(),
        }
    }

    #[must_use]
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }
}

/// Verifies token signatures and expiry; pure, in-memory computation with
/// no I/O, safe for concurrent use without locking.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    #[must_use]
    pub fn new(config: &SigningConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is a strict value comparison against the current time.
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(config.secret_key().expose_secret().as_bytes()),
            validation,
        }
    }

    /// Verify structural well-formedness, signature, and expiry, and extract
    /// the token's claims.
    ///
    /// # Errors
    /// [`AuthError::TokenExpired`] when the expiry claim is in the past;
    /// [`AuthError::TokenInvalid`] for every other decode failure, including
    /// unexpected internal faults. Detail goes to the log, never the caller.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                tracing::debug!("token validation failed: {e}");
                if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                    Err(AuthError::TokenExpired)
                } else {
                    Err(AuthError::TokenInvalid)
                }
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};

    fn sign(secret: &str, claims: &Claims) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn validator(secret: &str) -> TokenValidator {
        TokenValidator::new(&SigningConfig::new(secret))
    }

    #[test]
    fn valid_token_yields_claims() {
        let claims = Claims {
            sub: "alice".to_owned(),
            exp: chrono::Utc::now().timestamp() + 3600,
            roles: vec!["admin".to_owned()],
        };
        let token = sign("s3cr3t", &claims);

        let parsed = validator("s3cr3t").validate(&token).unwrap();
        assert_eq!(parsed.sub, "alice");
        assert_eq!(parsed.roles, vec!["admin".to_owned()]);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let claims = Claims {
            sub: "alice".to_owned(),
            exp: chrono::Utc::now().timestamp() - 1,
            roles: Vec::new(),
        };
        let token = sign("s3cr3t", &claims);

        assert_eq!(
            validator("s3cr3t").validate(&token),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let claims = Claims {
            sub: "alice".to_owned(),
            exp: chrono::Utc::now().timestamp() + 3600,
            roles: Vec::new(),
        };
        let token = sign("other-secret", &claims);

        assert_eq!(
            validator("s3cr3t").validate(&token),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert_eq!(
            validator("s3cr3t").validate("not.a.jwt"),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn token_without_expiry_never_validates() {
        // Hand-roll a claims object with no exp field.
        let header = Header::default();
        let token = jsonwebtoken::encode(
            &header,
            &serde_json::json!({ "sub": "alice", "roles": [] }),
            &EncodingKey::from_secret(b"s3cr3t"),
        )
        .unwrap();

        assert_eq!(
            validator("s3cr3t").validate(&token),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn missing_roles_claim_defaults_to_empty() {
        let token = jsonwebtoken::encode(
            &Header::default(),
            &serde_json::json!({
                "sub": "bob",
                "exp": chrono::Utc::now().timestamp() + 60,
            }),
            &EncodingKey::from_secret(b"s3cr3t"),
        )
        .unwrap();

        let parsed = validator("s3cr3t").validate(&token).unwrap();
        assert!(parsed.roles.is_empty());
    }
}
