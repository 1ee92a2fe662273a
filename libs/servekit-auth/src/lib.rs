#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod axum_ext;
pub mod chain;
pub mod claims;
pub mod errors;
pub mod response;
pub mod route_policy;
pub mod stages;
pub mod token;

pub use axum_ext::{AuthLayer, Security};
pub use chain::{AuthOutcome, AuthRequest, AuthenticatorChain, Authenticator, ChainDecision};
pub use claims::Claims;
pub use errors::AuthError;
pub use response::ErrorBody;
pub use route_policy::{RouteAuth, RoutePolicy, RoutePolicyBuilder, RouteRegistrationError};
pub use stages::{BearerAuthenticator, CatchAllAuthenticator, NoOpAuthenticator};
pub use token::{SigningConfig, TokenValidator};
