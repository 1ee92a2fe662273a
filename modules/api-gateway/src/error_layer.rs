use axum::{extract::Request, middleware::Next, response::Response};
use http::header;
use servekit_auth::response::{negotiate_error_format, render_error};

/// Give bare error responses a structured body.
///
/// Fallback responses from the router (404, 405) and inner layers arrive
/// with an empty body and no content type; rewrite them into the
/// negotiated error entity so every failure a client sees carries
/// `errorMessage`. Responses that already have a body are left alone.
pub async fn error_mapping_middleware(request: Request, next: Next) -> Response {
    let accept = request.headers().get(header::ACCEPT).cloned();
    let response = next.run(request).await;

    let status = response.status();
    let bare = (status.is_client_error() || status.is_server_error())
        && !response.headers().contains_key(header::CONTENT_TYPE);
    if !bare {
        return response;
    }

    let message = status.canonical_reason().unwrap_or("request failed");
    render_error(status, message, negotiate_error_format(accept.as_ref()))
}
