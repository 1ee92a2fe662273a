use std::collections::BTreeSet;

/// The authenticated subject of a request together with its role set.
///
/// Built by whichever authenticator stage validates the request's
/// credential. Immutable once constructed and owned by the single
/// `SecurityContext` that carries it; never shared across requests.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Principal {
    subject: String,
    roles: BTreeSet<String>,
}

impl Principal {
    /// Create a principal from a subject and its role claims.
    pub fn new(subject: impl Into<String>, roles: impl IntoIterator<Item = String>) -> Self {
        Self {
            subject: subject.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// The subject identifier (the token's `sub` claim for bearer auth).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The full role set carried by the principal.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Exact set membership — no role hierarchy, no wildcard matching.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// `SecurityContext` encapsulates the security-related information for a request.
///
/// Built once per request by the authenticator chain and passed through the
/// request lifecycle in read-only form. An absent principal means the request
/// is unauthenticated (whitelisted routes and disabled auth produce this).
#[derive(Debug, Clone)]
pub struct SecurityContext {
    principal: Option<Principal>,
    /// Transport-security flag captured at construction, never re-derived.
    secure: bool,
    /// Literal scheme string of the establishing authenticator.
    scheme: Option<&'static str>,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder.
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Create an anonymous `SecurityContext` with no principal or scheme.
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    /// The authenticated principal, if any.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Whether an authenticator stage established an identity.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Exact role membership against the principal's role set.
    /// Always false for anonymous contexts.
    #[must_use]
    pub fn is_user_in_role(&self, role: &str) -> bool {
        self.principal.as_ref().is_some_and(|p| p.has_role(role))
    }

    /// The transport-security flag captured when the context was built.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// The literal scheme used to authenticate (e.g. `"Bearer"`), constant
    /// per authenticator type. `None` for anonymous contexts.
    #[must_use]
    pub fn authentication_scheme(&self) -> Option<&'static str> {
        self.scheme
    }
}

#[derive(Debug, Default)]
pub struct SecurityContextBuilder {
    principal: Option<Principal>,
    secure: bool,
    scheme: Option<&'static str>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn scheme(mut self, scheme: &'static str) -> Self {
        self.scheme = Some(scheme);
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            principal: self.principal,
            secure: self.secure,
            scheme: self.scheme,
        }
    }
}
