use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::response::{ErrorFormat, render_error};

/// Authentication and authorization failures surfaced to clients.
///
/// Every variant maps to a short, non-leaking message; whatever internal
/// detail caused the failure is logged where it occurred and never included
/// in the response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Credential was recognized but is malformed or carries a bad signature.
    #[error("token is invalid")]
    TokenInvalid,
    /// Credential was recognized and well-formed but its expiry is in the past.
    #[error("token is expired")]
    TokenExpired,
    /// No stage established an identity and the route is not whitelisted.
    #[error("authentication required")]
    Unauthenticated,
    /// An identity was established but lacks a role the route requires.
    #[error("access denied")]
    Forbidden,
    /// Pipeline misconfiguration (e.g. extractor used without the layer).
    #[error("{0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status the error surfaces as.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TokenInvalid | Self::TokenExpired | Self::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        render_error(self.status(), &self.to_string(), ErrorFormat::Json)
    }
}
