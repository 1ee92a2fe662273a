//! Axum extractors and middleware for the authenticator chain.

use crate::{
    chain::{AuthRequest, AuthenticatorChain, ChainDecision},
    errors::AuthError,
    response::error_response,
    route_policy::{RouteAuth, RoutePolicy},
};
use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{HeaderMap, Method, request::Parts},
    response::Response,
};
use servekit_security::SecurityContext;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// Extractor for `SecurityContext` - validates that the auth middleware has run.
#[derive(Debug, Clone)]
pub struct Security(pub SecurityContext);

impl<S> FromRequestParts<S> for Security
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(Security)
            .ok_or(AuthError::Internal(
                "SecurityContext not found - auth middleware not configured".to_owned(),
            ))
    }
}

/// Shared state for the authentication middleware.
struct AuthState {
    chain: Arc<AuthenticatorChain>,
    policy: Arc<RoutePolicy>,
    assume_secure: bool,
}

/// Layer that runs the authenticator chain in front of a service.
///
/// # Example
/// ```ignore
/// router = router.layer(AuthLayer::new(chain, policy));
/// ```
#[derive(Clone)]
pub struct AuthLayer {
    state: Arc<AuthState>,
}

impl AuthLayer {
    #[must_use]
    pub fn new(chain: Arc<AuthenticatorChain>, policy: Arc<RoutePolicy>) -> Self {
        Self {
            state: Arc::new(AuthState {
                chain,
                policy,
                assume_secure: false,
            }),
        }
    }

    /// Treat every connection as transport-secure (TLS terminated upstream).
    #[must_use]
    pub fn assume_secure(self, assume_secure: bool) -> Self {
        Self {
            state: Arc::new(AuthState {
                chain: Arc::clone(&self.state.chain),
                policy: Arc::clone(&self.state.policy),
                assume_secure,
            }),
        }
    }
}

/// Service that runs the authenticator chain per request.
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    state: Arc<AuthState>,
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            state: self.state.clone(),
        }
    }
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let state = self.state.clone();
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            // CORS preflight never carries credentials; skip the chain.
            if is_preflight_request(request.method(), request.headers()) {
                return ready_inner.call(request).await;
            }

            let route = state.policy.resolve(request.method(), request.uri().path());
            let secure = state.assume_secure || forwarded_proto_is_https(request.headers());

            let decision = {
                let auth_request = AuthRequest::new(request.headers(), secure);
                state.chain.evaluate(&auth_request, &route)
            };

            match decision {
                ChainDecision::Authenticated(ctx) => {
                    request.extensions_mut().insert(ctx);
                    request.extensions_mut().insert(Arc::clone(&route));
                    ready_inner.call(request).await
                }
                ChainDecision::Anonymous => {
                    request
                        .extensions_mut()
                        .insert(SecurityContext::builder().secure(secure).build());
                    request.extensions_mut().insert(Arc::clone(&route));
                    ready_inner.call(request).await
                }
                ChainDecision::Rejected(err) => {
                    tracing::debug!(
                        method = %request.method(),
                        path = %request.uri().path(),
                        "request rejected by authenticator chain: {err}"
                    );
                    Ok(error_response(
                        err.status(),
                        &err.to_string(),
                        request.headers(),
                    ))
                }
            }
        })
    }
}

/// Whether the deployment reported TLS termination upstream of this hop.
fn forwarded_proto_is_https(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

/// Check if this is a CORS preflight request
///
/// Preflight requests are OPTIONS requests with:
/// - Origin header present
/// - Access-Control-Request-Method header present
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(axum::http::header::ORIGIN)
        && headers.contains_key(axum::http::header::ACCESS_CONTROL_REQUEST_METHOD)
}

// Note: coverage of the full layer lives in tests/auth_integration.rs;
// driving it requires the whole Axum middleware stack.

/// Downstream view of the resolved route descriptor, inserted by the layer
/// for role-based access control.
pub type ResolvedRouteAuth = Arc<RouteAuth>;
