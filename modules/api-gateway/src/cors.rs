use std::time::Duration;

use http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer from configuration.
///
/// `["*"]` in any list maps to the permissive wildcard; entries that fail
/// to parse are skipped with a warning rather than failing startup.
pub fn build_cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    layer = if cfg.allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                origin
                    .parse()
                    .inspect_err(|e| tracing::warn!("skipping unparseable CORS origin '{origin}': {e}"))
                    .ok()
            })
            .collect();
        layer.allow_origin(origins)
    };

    layer = if cfg.allowed_methods.iter().any(|m| m == "*") {
        layer.allow_methods(Any)
    } else {
        let methods: Vec<Method> = cfg
            .allowed_methods
            .iter()
            .filter_map(|method| {
                method
                    .parse()
                    .inspect_err(|e| tracing::warn!("skipping unparseable CORS method '{method}': {e}"))
                    .ok()
            })
            .collect();
        layer.allow_methods(methods)
    };

    layer = if cfg.allowed_headers.iter().any(|h| h == "*") {
        layer.allow_headers(Any)
    } else {
        let headers: Vec<HeaderName> = cfg
            .allowed_headers
            .iter()
            .filter_map(|header| {
                header
                    .parse()
                    .inspect_err(|e| tracing::warn!("skipping unparseable CORS header '{header}': {e}"))
                    .ok()
            })
            .collect();
        layer.allow_headers(headers)
    };

    if cfg.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer.max_age(Duration::from_secs(cfg.max_age_seconds))
}
