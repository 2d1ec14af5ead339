//! CORS headers for the website that embeds the feed link.
//!
//! A known origin (the configured website or any localhost origin) is echoed
//! back; everything else gets the configured origin, which browsers then
//! refuse. Preflight requests are answered here and never reach a handler.

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS, ORIGIN, VARY,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

const ALLOWED_METHODS: &str = "GET, OPTIONS";
const DEFAULT_ALLOWED_HEADERS: &str = "Content-Type";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Origin to put in `Access-Control-Allow-Origin`.
pub fn allow_origin<'a>(allowed: &'a str, origin: Option<&'a str>) -> &'a str {
    match origin {
        Some(origin) if origin == allowed || origin.contains("localhost") => origin,
        _ => allowed,
    }
}

pub async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let requested_headers = request.headers().get(ACCESS_CONTROL_REQUEST_HEADERS).cloned();

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let allowed = allow_origin(&state.settings.access.allowed_origin, origin.as_deref());
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(allowed) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.append(VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        requested_headers.unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS)),
    );
    headers.insert(
        ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );

    response
}
