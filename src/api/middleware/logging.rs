//! Request logging with a propagated request id

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, info, warn};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Fields logged for one request
struct RequestLog {
    method: Method,
    path: String,
    request_id: String,
    started: Instant,
}

impl RequestLog {
    fn begin(request: &Request<Body>) -> Self {
        let log = Self {
            method: request.method().clone(),
            path: extract_path(request),
            request_id: extract_request_id(request),
            started: Instant::now(),
        };
        debug!(method = %log.method, path = %log.path, request_id = %log.request_id, "Request received");
        log
    }

    fn finish(&self, status: StatusCode) {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;

        match status {
            s if s.is_server_error() => warn!(
                method = %self.method, path = %self.path, status = s.as_u16(),
                elapsed_ms, request_id = %self.request_id, "Request failed"
            ),
            s => info!(
                method = %self.method, path = %self.path, status = s.as_u16(),
                elapsed_ms, request_id = %self.request_id, "Request handled"
            ),
        }
    }
}

/// Logs each request and echoes `x-request-id` on the response.
/// No span is opened here; `TraceLayer` owns that.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let log = RequestLog::begin(&request);

    let mut response = next.run(request).await;
    log.finish(response.status());

    if let Ok(value) = HeaderValue::from_str(&log.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Route template when matched, raw path otherwise
fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or(request.uri().path(), MatchedPath::as_str)
        .to_owned()
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_owned)
}
