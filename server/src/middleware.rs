//! Request interceptors applied to every route, in order:
//! [`log_requests`] (outermost), [`json_content_type`], then [`cors`].
//!
//! `cors` answers preflight requests itself, so `OPTIONS` never reaches
//! routing and works for any path. It also turns `HEAD` away with a 405;
//! axum would otherwise serve it from the `GET` handlers.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PATCH, DELETE";
pub const ALLOW_HEADERS: &str = "accept, content-type";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Log method, uri, status and elapsed time of each request.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed = ?started.elapsed(),
        "handled request"
    );
    response
}

pub async fn json_content_type(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    response
}

/// Attach the CORS headers to every response and short-circuit preflight.
pub async fn cors(req: Request, next: Next) -> Response {
    let mut response = match *req.method() {
        Method::OPTIONS => StatusCode::OK.into_response(),
        Method::HEAD => ApiError::MethodNotAllowed.into_response(),
        _ => next.run(req).await,
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    response
}
