//! Per-request access log with slow-route detection.

use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const SEARCH_ROUTE: &str = "/movies/search";

/// Longest acceptable response time of `route` before it is logged as slow.
pub fn max_acceptable_response_time(route: &str) -> Duration {
    if route == SEARCH_ROUTE {
        Duration::from_millis(700)
    } else {
        Duration::from_millis(100)
    }
}

/// Logs method, route, status and latency of every matched request and tags
/// the response with a request id.
pub async fn log_request(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let request_id = Uuid::new_v4().to_string();

    let mut response = next.run(request).await;

    let elapsed = started.elapsed();
    let threshold = max_acceptable_response_time(&route);
    let status = response.status();
    let latency_ms = elapsed.as_millis() as u64;
    let slow = elapsed > threshold;

    if status.is_server_error() {
        tracing::error!(%request_id, %method, %uri, status = status.as_u16(), latency_ms, slow, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(%request_id, %method, %uri, status = status.as_u16(), latency_ms, slow, "Request rejected");
    } else if slow {
        tracing::warn!(
            %request_id,
            %method,
            %uri,
            status = status.as_u16(),
            latency_ms,
            threshold_ms = threshold.as_millis() as u64,
            "Slow response"
        );
    } else {
        tracing::info!(%request_id, %method, %uri, status = status.as_u16(), latency_ms, "Request served");
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
