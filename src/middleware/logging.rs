use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;

/// Endpoints whose bodies carry credentials or tokens
const REDACTED_PATHS: [&str; 2] = ["/users/login", "/users/register"];

/// Middleware that logs request and response bodies
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let redact = is_redacted(uri.path());
    let start = Instant::now();

    let (parts, body) = request.into_parts();

    // Read the request body (limit to 1MB to prevent memory issues)
    let bytes = match to_bytes(body, 1024 * 1024).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Failed to read request body: {}", e);
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };

    let request_body = loggable_body(&bytes, redact);

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        body = %request_body,
        "→ Request"
    );

    let request = Request::from_parts(parts, Body::from(bytes));

    let response = next.run(request).await;

    let status = response.status();
    let (parts, body) = response.into_parts();

    let bytes = match to_bytes(body, 1024 * 1024).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Failed to read response body: {}", e);
            Bytes::new()
        }
    };

    let response_body = loggable_body(&bytes, redact);
    let latency = start.elapsed();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        latency_ms = %latency.as_millis(),
        body = %response_body,
        "← Response"
    );

    Response::from_parts(parts, Body::from(bytes))
}

fn is_redacted(path: &str) -> bool {
    REDACTED_PATHS
        .iter()
        .any(|redacted| path.trim_end_matches('/').ends_with(redacted))
}

fn loggable_body(bytes: &Bytes, redact: bool) -> String {
    if redact {
        return format!("[redacted, {} bytes]", bytes.len());
    }
    truncate_body(&String::from_utf8_lossy(bytes), 2000)
}

/// Truncate body for logging, adding ellipsis if truncated
fn truncate_body(body: &str, max_len: usize) -> String {
    let body = body.trim();
    if body.len() <= max_len {
        return body.to_string();
    }

    let mut end = max_len;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated, {} bytes total]", &body[..end], body.len())
}
