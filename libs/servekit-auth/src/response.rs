//! Failure-response body model and content negotiation.
//!
//! Rejections from the pipeline carry a single-field structured body,
//! serialized in the representation negotiated from the request's `Accept`
//! header. JSON is the fallback when nothing acceptable is negotiated.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, HeaderValue, StatusCode, header};
use serde::{Deserialize, Serialize};

/// Structured error entity returned on rejected requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
        }
    }
}

/// Representations the pipeline can produce for error entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFormat {
    Json,
    PlainText,
}

/// Pick an error representation from an `Accept` header value.
///
/// The first supported media type in header order wins; quality weights are
/// not interpreted. A missing, unreadable, or wholly unsupported header
/// negotiates the JSON fallback.
#[must_use]
pub fn negotiate_error_format(accept: Option<&HeaderValue>) -> ErrorFormat {
    let Some(accept) = accept.and_then(|v| v.to_str().ok()) else {
        return ErrorFormat::Json;
    };

    for item in accept.split(',') {
        let Ok(media) = item.trim().parse::<mime::Mime>() else {
            continue;
        };
        let (kind, subtype) = (media.type_(), media.subtype());
        if kind == mime::STAR || (kind == mime::APPLICATION && (subtype == mime::JSON || subtype == mime::STAR)) {
            return ErrorFormat::Json;
        }
        if kind == mime::TEXT && (subtype == mime::PLAIN || subtype == mime::STAR) {
            return ErrorFormat::PlainText;
        }
    }

    ErrorFormat::Json
}

/// Render an error entity in the given representation.
#[must_use]
pub fn render_error(status: StatusCode, message: &str, format: ErrorFormat) -> Response {
    match format {
        ErrorFormat::Json => (status, Json(ErrorBody::new(message))).into_response(),
        ErrorFormat::PlainText => (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message.to_owned(),
        )
            .into_response(),
    }
}

/// Render an error entity negotiated from the request headers.
#[must_use]
pub fn error_response(status: StatusCode, message: &str, request_headers: &HeaderMap) -> Response {
    let format = negotiate_error_format(request_headers.get(header::ACCEPT));
    render_error(status, message, format)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn accept(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    #[test]
    fn missing_accept_falls_back_to_json() {
        assert_eq!(negotiate_error_format(None), ErrorFormat::Json);
    }

    #[test]
    fn json_accept_negotiates_json() {
        assert_eq!(
            negotiate_error_format(Some(&accept("application/json"))),
            ErrorFormat::Json
        );
    }

    #[test]
    fn plain_text_accept_negotiates_text() {
        assert_eq!(
            negotiate_error_format(Some(&accept("text/plain"))),
            ErrorFormat::PlainText
        );
    }

    #[test]
    fn first_supported_media_type_wins() {
        assert_eq!(
            negotiate_error_format(Some(&accept("text/plain, application/json"))),
            ErrorFormat::PlainText
        );
        assert_eq!(
            negotiate_error_format(Some(&accept("application/xml, text/plain"))),
            ErrorFormat::PlainText
        );
    }

    #[test]
    fn unsupported_accept_falls_back_to_json() {
        assert_eq!(
            negotiate_error_format(Some(&accept("application/xml"))),
            ErrorFormat::Json
        );
    }

    #[test]
    fn wildcard_negotiates_json() {
        assert_eq!(
            negotiate_error_format(Some(&accept("*/*"))),
            ErrorFormat::Json
        );
    }

    #[test]
    fn error_body_serializes_with_camel_case_field() {
        let body = ErrorBody::new("token is invalid");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "errorMessage": "token is invalid" })
        );
    }
}
