use crate::api::error::ErrorName;
use axum::extract::{MatchedPath, Request};
use axum::http::header::ORIGIN;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::{debug, error, info};

/// Logs every request along with the status of its response.
///
/// Only the matched route template is logged, never the raw path, so that
/// nicknames and slugs stay out of the logs.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or("<unmatched>", MatchedPath::as_str)
        .to_owned();
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_owned();

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;

    let status = response.status().as_u16();
    let error_name = response.extensions().get::<ErrorName>().map_or("", |name| name.0);
    let route = route.as_str();
    let origin = origin.as_str();
    if response.status().is_server_error() {
        error!(%method, route, origin, status, error = error_name, elapsed_ms, "Request failed");
    } else if response.status().is_client_error() {
        debug!(%method, route, origin, status, error = error_name, elapsed_ms, "Request rejected");
    } else {
        info!(%method, route, origin, status, elapsed_ms, "Request handled");
    }
    response
}
