#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod config;
mod cors;
mod error_layer;
mod health;
mod rbac;
pub mod router;
pub mod telemetry;

pub use config::{AuthSettings, CorsConfig, GatewayConfig};
pub use router::{GatewayBuilder, GroupAuth, RouteGroup};
pub use telemetry::init_tracing;

// Re-exported so callers can declare routes and read identities without
// depending on the auth crates directly.
pub use servekit_auth::{RouteAuth, Security};
pub use servekit_security::{Principal, SecurityContext};
