use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use http::StatusCode;
use servekit_auth::axum_ext::ResolvedRouteAuth;
use servekit_auth::{AuthError, response::error_response};
use servekit_security::SecurityContext;

/// Enforce the route's required roles after authentication has run.
///
/// A non-empty role set requires the established principal to hold at least
/// one of the listed roles (exact membership); otherwise the request is
/// rejected with 403 before the handler runs. Routes without requirements
/// pass untouched. This runs even when a route was whitelisted through a
/// group-level permit-all, so a route-level role requirement is never
/// bypassed.
pub async fn enforce_roles(request: Request, next: Next) -> Response {
    let Some(route) = request.extensions().get::<ResolvedRouteAuth>() else {
        // Auth layer did not run for this request (e.g. preflight).
        return next.run(request).await;
    };

    let required = route.roles_required();
    if required.is_empty() {
        return next.run(request).await;
    }

    let permitted = request
        .extensions()
        .get::<SecurityContext>()
        .is_some_and(|ctx| required.iter().any(|role| ctx.is_user_in_role(role)));

    if permitted {
        next.run(request).await
    } else {
        let subject = request
            .extensions()
            .get::<SecurityContext>()
            .and_then(|ctx| ctx.principal().map(|p| p.subject().to_owned()));
        tracing::debug!(
            path = %request.uri().path(),
            subject = subject.as_deref().unwrap_or("<anonymous>"),
            "principal lacks required role"
        );
        let err = AuthError::Forbidden;
        error_response(StatusCode::FORBIDDEN, &err.to_string(), request.headers())
    }
}
