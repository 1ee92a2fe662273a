//! Concrete authenticator stages.

use servekit_security::{Principal, SecurityContext};

use crate::chain::{AuthOutcome, AuthRequest, Authenticator};
use crate::errors::AuthError;
use crate::token::TokenValidator;

/// Validates `Authorization: Bearer <token>` credentials.
///
/// The scheme match is case-sensitive and requires exactly one separating
/// space; any other header shape is a pass-through, not a rejection — a
/// missing or foreign scheme is not a validation failure.
pub struct BearerAuthenticator {
    validator: TokenValidator,
}

impl BearerAuthenticator {
    pub const SCHEME: &'static str = "Bearer";

    #[must_use]
    pub fn new(validator: TokenValidator) -> Self {
        Self { validator }
    }

    /// Extract the raw token if the header carries this stage's scheme
    /// followed by exactly one space.
    fn token(header: &str) -> Option<&str> {
        header
            .strip_prefix(Self::SCHEME)?
            .strip_prefix(' ')
            .map(str::trim)
    }
}

impl Authenticator for BearerAuthenticator {
    fn scheme(&self) -> Option<&'static str> {
        Some(Self::SCHEME)
    }

    fn authenticate(&self, request: &AuthRequest<'_>, whitelisted: bool) -> AuthOutcome {
        if whitelisted {
            return AuthOutcome::Passthrough;
        }
        let Some(token) = request.authorization().and_then(Self::token) else {
            return AuthOutcome::Passthrough;
        };

        match self.validator.validate(token) {
            Ok(claims) => {
                let principal = Principal::new(claims.sub, claims.roles);
                AuthOutcome::Established(
                    SecurityContext::builder()
                        .principal(principal)
                        .secure(request.is_secure())
                        .scheme(Self::SCHEME)
                        .build(),
                )
            }
            Err(err) => {
                tracing::info!("bearer token validation failed: {err}");
                AuthOutcome::Abort(err)
            }
        }
    }
}

/// Stage that never recognizes anything; useful as a placeholder slot in a
/// configured chain.
pub struct NoOpAuthenticator;

impl Authenticator for NoOpAuthenticator {
    fn authenticate(&self, _request: &AuthRequest<'_>, _whitelisted: bool) -> AuthOutcome {
        AuthOutcome::Passthrough
    }
}

/// Terminal stage: rejects any request that reaches it without an identity
/// and without a whitelist exemption.
pub struct CatchAllAuthenticator;

impl Authenticator for CatchAllAuthenticator {
    fn authenticate(&self, _request: &AuthRequest<'_>, whitelisted: bool) -> AuthOutcome {
        if whitelisted {
            AuthOutcome::Passthrough
        } else {
            AuthOutcome::Abort(AuthError::Unauthenticated)
        }
    }
}
