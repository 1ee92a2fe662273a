//! Router assembly with statically-declared route authorization.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    extract::Request,
    middleware::{Next, from_fn},
    routing::{MethodRouter, get},
};
use http::Method;
use servekit_auth::{
    AuthLayer, AuthenticatorChain, BearerAuthenticator, RouteAuth, RoutePolicyBuilder,
    RouteRegistrationError, SigningConfig, TokenValidator,
};
use servekit_security::SecurityContext;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::{cors, error_layer, health, rbac};

/// Authorization stance of a route group, applied to every contained route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAuth {
    /// Contained routes keep their own requirements.
    Authenticated,
    /// Group-level permit-all: contained routes without role requirements
    /// skip authentication; a route-level role requirement revokes the
    /// exemption for that route.
    PermitAll,
}

/// Routes collected for registration under a common prefix and group stance.
#[derive(Default)]
pub struct RouteGroup {
    routes: Vec<(Method, String, MethodRouter, RouteAuth)>,
}

impl RouteGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, method: Method, path: &str, handler: MethodRouter, auth: RouteAuth) -> Self {
        self.routes.push((method, path.to_owned(), handler, auth));
        self
    }
}

/// Builds the service router with its authorization descriptors and the
/// standard middleware stack.
pub struct GatewayBuilder {
    config: GatewayConfig,
    router: Router,
    policy: RoutePolicyBuilder,
}

impl GatewayBuilder {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            router: Router::new(),
            policy: RoutePolicyBuilder::new(),
        }
    }

    /// Register a route together with its authorization descriptor.
    ///
    /// # Errors
    /// Returns [`RouteRegistrationError`] for conflicting or malformed
    /// path patterns.
    pub fn route(
        mut self,
        method: Method,
        path: &str,
        handler: MethodRouter,
        auth: RouteAuth,
    ) -> Result<Self, RouteRegistrationError> {
        self.policy.route(method, path, auth)?;
        self.router = self.router.route(path, handler);
        Ok(self)
    }

    /// Register a group of routes under a shared prefix and group stance.
    ///
    /// # Errors
    /// Returns [`RouteRegistrationError`] for conflicting or malformed
    /// path patterns.
    pub fn group(
        mut self,
        prefix: &str,
        stance: GroupAuth,
        group: RouteGroup,
    ) -> Result<Self, RouteRegistrationError> {
        for (method, path, handler, auth) in group.routes {
            let full_path = format!("{prefix}{path}");
            let auth = match stance {
                GroupAuth::PermitAll => auth.in_permit_all_group(),
                GroupAuth::Authenticated => auth,
            };
            self.policy.route(method, &full_path, auth)?;
            self.router = self.router.route(&full_path, handler);
        }
        Ok(self)
    }

    /// Finish the router: health endpoints plus the middleware stack.
    ///
    /// # Errors
    /// Fails on invalid configuration or conflicting built-in routes.
    pub fn build(mut self) -> Result<Router> {
        let config = self.config;
        config.validate()?;

        // Built-in health probes, always public.
        self.policy
            .route(Method::GET, "/health", RouteAuth::permit_all())?;
        self.policy
            .route(Method::GET, "/healthz", RouteAuth::permit_all())?;
        let mut router = self
            .router
            .route("/health", get(health::health_check))
            .route("/healthz", get(|| async { "ok" }));

        let policy = Arc::new(self.policy.build());

        // `Router::layer` makes the last added layer the outermost one, so
        // layers are added innermost-first. Request execution order:
        // Trace -> CORS -> ErrorMapping -> Auth -> RBAC -> handler.
        if config.auth.enabled && config.rbac_enabled {
            router = router.layer(from_fn(rbac::enforce_roles));
        }

        if config.auth.enabled {
            let signing = SigningConfig::new(config.auth.secret_key.clone());
            let chain = AuthenticatorChain::new(vec![Box::new(BearerAuthenticator::new(
                TokenValidator::new(&signing),
            ))]);
            router = router.layer(
                AuthLayer::new(Arc::new(chain), Arc::clone(&policy))
                    .assume_secure(config.auth.assume_secure_transport),
            );
        } else {
            tracing::warn!(
                "gateway authentication is DISABLED: every request runs with an anonymous \
                 security context"
            );
            router = router.layer(from_fn(anonymous_context_middleware));
        }

        router = router.layer(from_fn(error_layer::error_mapping_middleware));

        if config.cors_enabled {
            let cors_cfg = config.cors.clone().unwrap_or_default();
            router = router.layer(cors::build_cors_layer(&cors_cfg));
        }

        Ok(router.layer(TraceLayer::new_for_http()))
    }
}

async fn anonymous_context_middleware(mut request: Request, next: Next) -> axum::response::Response {
    request.extensions_mut().insert(SecurityContext::anonymous());
    next.run(request).await
}
