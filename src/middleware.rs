//! Request and response middleware
//!
//! - identity resolution before every handler
//! - CORS headers on every response, preflight answered directly
//! - pretty-printed JSON unless the request came from XHR

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
            CONTENT_LENGTH, CONTENT_TYPE, ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::CallerIdentity;
use crate::state::AppState;

pub const EXPOSE_HEADERS: &str = "Content-Length, Content-Type, Location";
pub const ALLOW_HEADERS: &str =
    "Content-Length, Content-Type, X-Annotator-Auth-Token, X-Requested-With";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const MAX_AGE: &str = "86400";

/// Bind the caller's identity to the request
///
/// A user resolved by the authenticator always wins. Otherwise an identity
/// bound further out is left alone, and only a request with none at all is
/// marked anonymous.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match state.authenticator().resolve_identity(req.headers()).await {
        Some(identity) => {
            tracing::debug!(user = %identity.id, consumer = %identity.consumer.key, "Resolved caller");
            req.extensions_mut()
                .insert(CallerIdentity::Authenticated(identity));
        }
        None => {
            if req.extensions().get::<CallerIdentity>().is_none() {
                req.extensions_mut().insert(CallerIdentity::Anonymous);
            }
        }
    }

    next.run(req).await
}

/// Decorate every response with CORS headers
pub async fn cors(req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));
    let preflight = req.method() == Method::OPTIONS;

    let mut response = if preflight {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(EXPOSE_HEADERS),
    );

    if preflight {
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));
    }

    response
}

/// Indent JSON bodies for humans; XHR callers get them compact
pub async fn shape_json(req: Request, next: Next) -> Response {
    let compact = is_xhr(req.headers());
    let response = next.run(req).await;

    if compact || !is_json(response.headers()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to buffer response body: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let pretty = serde_json::from_slice::<serde_json::Value>(&bytes)
        .and_then(|value| serde_json::to_vec_pretty(&value));

    match pretty {
        Ok(pretty) => {
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(pretty))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}

fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false)
}

/// `application/json` or any `application/*+json`
pub fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
