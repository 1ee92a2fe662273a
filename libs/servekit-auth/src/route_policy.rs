//! Per-route authorization metadata and whitelist resolution.
//!
//! Descriptors are built statically at route-registration time and shared
//! read-only across all requests to the route; there is no runtime
//! discovery of authorization attributes.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use http::Method;

/// Authorization metadata attached to one registered route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAuth {
    permit_all: bool,
    group_permit_all: bool,
    roles_required: BTreeSet<String>,
}

impl RouteAuth {
    /// Route requires an authenticated identity (the default).
    #[must_use]
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Route itself permits anonymous access.
    #[must_use]
    pub fn permit_all() -> Self {
        Self {
            permit_all: true,
            ..Self::default()
        }
    }

    /// Route requires one of the given roles.
    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles_required: roles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Mark the route as belonging to a group that permits anonymous access.
    ///
    /// A group-level permit-all is weaker than a route-level one: it is
    /// revoked for any route that declares required roles.
    #[must_use]
    pub fn in_permit_all_group(mut self) -> Self {
        self.group_permit_all = true;
        self
    }

    /// Roles the route requires, empty when unrestricted.
    #[must_use]
    pub fn roles_required(&self) -> &BTreeSet<String> {
        &self.roles_required
    }

    /// Whether requests to this route may skip authentication.
    ///
    /// Precedence, exactly:
    /// 1. the route itself declares permit-all → whitelisted;
    /// 2. else the containing group declares permit-all *and* the route
    ///    declares no required roles → whitelisted;
    /// 3. otherwise → not whitelisted.
    #[must_use]
    pub fn is_whitelisted(&self) -> bool {
        if self.permit_all {
            return true;
        }
        self.group_permit_all && self.roles_required.is_empty()
    }
}

/// Route-pattern registration failure.
#[derive(Debug, thiserror::Error)]
#[error("failed to register route pattern '{path}': {source}")]
pub struct RouteRegistrationError {
    path: String,
    #[source]
    source: matchit::InsertError,
}

/// Collects route descriptors during router construction.
#[derive(Default)]
pub struct RoutePolicyBuilder {
    matchers: HashMap<Method, matchit::Router<Arc<RouteAuth>>>,
}

impl RoutePolicyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a descriptor to `(method, path)`. Paths use the router's
    /// `{param}` pattern syntax.
    ///
    /// # Errors
    /// Returns [`RouteRegistrationError`] for conflicting or malformed
    /// patterns.
    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        auth: RouteAuth,
    ) -> Result<(), RouteRegistrationError> {
        self.matchers
            .entry(method)
            .or_default()
            .insert(path, Arc::new(auth))
            .map_err(|source| RouteRegistrationError {
                path: path.to_owned(),
                source,
            })
    }

    #[must_use]
    pub fn build(self) -> RoutePolicy {
        RoutePolicy {
            matchers: self.matchers,
            fallback: Arc::new(RouteAuth::authenticated()),
        }
    }
}

/// Immutable per-method route-descriptor registry, shared across requests.
pub struct RoutePolicy {
    matchers: HashMap<Method, matchit::Router<Arc<RouteAuth>>>,
    fallback: Arc<RouteAuth>,
}

impl RoutePolicy {
    /// Resolve the descriptor for `(method, path)`.
    ///
    /// Unregistered routes resolve to the fallback descriptor: authenticate,
    /// no role requirements.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Arc<RouteAuth> {
        self.matchers
            .get(method)
            .and_then(|matcher| matcher.at(path).ok())
            .map_or_else(|| Arc::clone(&self.fallback), |hit| Arc::clone(hit.value))
    }
}
