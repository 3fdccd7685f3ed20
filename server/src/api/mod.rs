mod doc;
pub mod error;
mod extract;
mod forum;
mod middleware;
mod post;
mod service;
mod thread;
mod user;

pub use error::{ApiError, ApiResult};

use crate::app::AppState;
use crate::config::Config;
use axum::{Router, routing};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

/// Builds the application's router. Every endpoint lives under `/api`.
pub fn routes(state: AppState) -> Router {
    let (api_router, openapi) = OpenApiRouter::with_openapi(doc::ApiDoc::openapi())
        .merge(user::routes())
        .merge(forum::routes())
        .merge(thread::routes())
        .merge(post::routes())
        .merge(service::routes())
        .split_for_parts();
    let request_timeout = Duration::from_secs(state.config.request_timeout_seconds);

    Router::new()
        .nest("/api", api_router)
        .route("/api-docs/openapi.json", routing::get(move || async move { axum::Json(openapi) }))
        .layer(axum::middleware::from_fn(middleware::log_request))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Validates a client-requested page size and clamps it to the configured maximum.
fn page_size(config: &Config, limit: Option<i64>) -> ApiResult<i64> {
    match limit {
        Some(limit) if limit < 0 => Err(ApiError::InvalidParam("limit")),
        limit => Ok(config.page_size(limit)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn page_size_validation() {
        let config = Config::from_toml(include_str!("../../config.toml.dist")).unwrap();
        assert_eq!(page_size(&config, None).unwrap(), config.default_page_size);
        assert_eq!(page_size(&config, Some(0)).unwrap(), 0);
        assert_eq!(page_size(&config, Some(15)).unwrap(), 15);
        assert!(matches!(page_size(&config, Some(-1)), Err(ApiError::InvalidParam("limit"))));
    }
}
