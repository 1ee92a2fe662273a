//! The ordered authenticator chain.
//!
//! Stages are composed into a fixed sequence at startup; ordering is a
//! program invariant, not discovered metadata. Each stage returns an
//! explicit [`AuthOutcome`] and the runner threads the established context
//! through — no stage mutates shared request state.

use http::{HeaderMap, header};
use servekit_security::SecurityContext;

use crate::errors::AuthError;
use crate::route_policy::RouteAuth;
use crate::stages::CatchAllAuthenticator;

/// Borrowed view of the request facts the chain inspects.
///
/// Evaluation is synchronous and pure: no I/O, no suspension, no external
/// calls.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequest<'a> {
    headers: &'a HeaderMap,
    secure: bool,
}

impl<'a> AuthRequest<'a> {
    #[must_use]
    pub fn new(headers: &'a HeaderMap, secure: bool) -> Self {
        Self { headers, secure }
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.headers
    }

    /// The `Authorization` header, if present and readable as UTF-8.
    #[must_use]
    pub fn authorization(&self) -> Option<&'a str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Transport-security flag of the underlying connection, as reported by
    /// the surrounding service.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.secure
    }
}

/// What a single stage decided about the request.
#[derive(Debug)]
pub enum AuthOutcome {
    /// The stage found no credential it recognizes; the next stage runs.
    Passthrough,
    /// The stage validated a credential and established an identity.
    Established(SecurityContext),
    /// The stage recognized a credential of its type but validation failed;
    /// the request terminates immediately.
    Abort(AuthError),
}

/// One link in the ordered authentication chain.
pub trait Authenticator: Send + Sync {
    /// Literal scheme string this stage parses, if it recognizes one.
    fn scheme(&self) -> Option<&'static str> {
        None
    }

    /// Inspect the request and decide. `whitelisted` is the route's
    /// resolved whitelist status; whitelisted requests pass through every
    /// stage untouched.
    fn authenticate(&self, request: &AuthRequest<'_>, whitelisted: bool) -> AuthOutcome;
}

/// Final decision for the request after the whole chain has run.
#[derive(Debug)]
pub enum ChainDecision {
    /// An identity was established; execution proceeds to the handler.
    Authenticated(SecurityContext),
    /// No identity, but the route is whitelisted (or authentication is
    /// disabled); execution proceeds unauthenticated.
    Anonymous,
    /// The request is rejected before the handler runs.
    Rejected(AuthError),
}

/// Fixed, ordered sequence of authenticator stages.
///
/// The terminal catch-all stage is appended at construction, so every
/// non-whitelisted request either carries an identity or is rejected —
/// there is no silent fallthrough to the handler.
pub struct AuthenticatorChain {
    stages: Vec<Box<dyn Authenticator>>,
}

impl AuthenticatorChain {
    #[must_use]
    pub fn new(mut stages: Vec<Box<dyn Authenticator>>) -> Self {
        stages.push(Box::new(CatchAllAuthenticator));
        Self { stages }
    }

    /// Run the stages in order against one request.
    ///
    /// Once a stage establishes a context the remaining stages are no-ops;
    /// an established context is never overwritten. An abort terminates
    /// evaluation immediately.
    #[must_use]
    pub fn evaluate(&self, request: &AuthRequest<'_>, route: &RouteAuth) -> ChainDecision {
        let whitelisted = route.is_whitelisted();
        let mut established: Option<SecurityContext> = None;

        for stage in &self.stages {
            if established.is_some() {
                break;
            }
            match stage.authenticate(request, whitelisted) {
                AuthOutcome::Passthrough => {}
                AuthOutcome::Established(ctx) => established = Some(ctx),
                AuthOutcome::Abort(err) => return ChainDecision::Rejected(err),
            }
        }

        match established {
            Some(ctx) => ChainDecision::Authenticated(ctx),
            None => ChainDecision::Anonymous,
        }
    }
}
