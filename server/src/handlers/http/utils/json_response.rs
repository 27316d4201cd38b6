use std::convert::Infallible;

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error};

use tollgate_shared::types::ErrorResponse;

/// Response type produced by every stage and handler.
pub type HttpResponse = Response<BoxBody<Bytes, Infallible>>;

pub fn full<T: Into<Bytes>>(chunk: T) -> BoxBody<Bytes, Infallible> {
    Full::new(chunk.into()).boxed()
}

pub fn empty() -> BoxBody<Bytes, Infallible> {
    Empty::<Bytes>::new().boxed()
}

/// Serialize any `Serialize` type and deliver it as a JSON response.
pub fn deliver_serialized_json<T: Serialize>(data: &T, status: StatusCode) -> Result<HttpResponse> {
    let json = serde_json::to_string(data).context("Failed to serialize response")?;

    debug!("Delivering serialized JSON response, size: {} bytes", json.len());

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(full(json))
        .map_err(|e| anyhow!("Failed to build JSON response: {}", e))
}

/// Delivers a JSON error response with the specified error code, message, and status.
pub fn deliver_error_json(
    error_code: &str,
    message: &str,
    status: StatusCode,
) -> Result<HttpResponse> {
    debug!(
        "Delivering error JSON: {} - {} ({})",
        status.as_u16(),
        error_code,
        message
    );
    deliver_serialized_json(&ErrorResponse::new(error_code, message), status)
}

// ---------------------------------------------------------------------------
// Infallible builders
// ---------------------------------------------------------------------------
//
// Used by the tower layers, which must always produce a response. Headers are
// static so nothing here can fail.

fn with_body(status: StatusCode, content_type: &'static str, body: Bytes) -> HttpResponse {
    let mut res = Response::new(full(body));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    res
}

pub fn plain_text(status: StatusCode, text: &'static str) -> HttpResponse {
    with_body(status, "text/plain; charset=utf-8", Bytes::from_static(text.as_bytes()))
}

pub fn status_only(status: StatusCode) -> HttpResponse {
    let mut res = Response::new(empty());
    *res.status_mut() = status;
    res
}

fn error_body(status: StatusCode, body: &ErrorResponse) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(json) => with_body(status, "application/json", Bytes::from(json)),
        Err(e) => {
            error!("Failed to serialize error body: {}", e);
            status_only(status)
        }
    }
}

/// `401` sent for every credential failure on a protected path.
pub fn login_required() -> HttpResponse {
    error_body(StatusCode::UNAUTHORIZED, &ErrorResponse::login_required())
}

/// `500` for a handler that returned an error.
pub fn internal_error() -> HttpResponse {
    error_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
    )
}
