use serde::{Deserialize, Serialize};

/// Claims carried by servekit-issued bearer tokens.
///
/// `sub` and `exp` are mandatory; a token without an expiry never
/// validates. `roles` defaults to the empty set when absent so tokens for
/// role-less subjects stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the token was issued to.
    pub sub: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    /// Role claims copied verbatim into the principal's role set.
    #[serde(default)]
    pub roles: Vec<String>,
}
