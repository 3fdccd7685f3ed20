use crate::api::doc::SERVICE_TAG;
use crate::api::error::ApiResult;
use crate::api::extract::Json;
use crate::app::AppState;
use crate::schema::{forum, post, thread, user};
use crate::update;
use axum::extract::State;
use diesel::prelude::*;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(status))
        .routes(routes!(clear))
}

/// Number of rows stored for each resource.
#[derive(Debug, Serialize, ToSchema)]
struct ServiceStatus {
    user: i64,
    forum: i64,
    thread: i64,
    post: i64,
}

/// Counts the users, forums, threads and posts that exist.
#[utoipa::path(
    get,
    path = "/service/status",
    tag = SERVICE_TAG,
    responses((status = 200, body = ServiceStatus)),
)]
async fn status(State(state): State<AppState>) -> ApiResult<Json<ServiceStatus>> {
    state.get_connection()?.transaction(|conn| {
        Ok(Json(ServiceStatus {
            user: user::table.count().first(conn)?,
            forum: forum::table.count().first(conn)?,
            thread: thread::table.count().first(conn)?,
            post: post::table.count().first(conn)?,
        }))
    })
}

/// Deletes every user, forum, thread, post and vote.
#[utoipa::path(
    post,
    path = "/service/clear",
    tag = SERVICE_TAG,
    responses((status = 200, description = "Database was cleared")),
)]
async fn clear(State(state): State<AppState>) -> ApiResult<()> {
    state.get_connection()?.transaction(|conn| update::clear_all(conn))?;
    info!("Cleared all data");
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::test::*;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    #[ignore = "requires a running PostgreSQL database"]
    async fn status_and_clear() {
        let server = test_server();
        reset_database();
        create_user_over_http(&server, "first").await;
        create_user_over_http(&server, "second").await;

        let response = server.get("/api/service/status").await;
        response.assert_status_ok();
        response.assert_json(&json!({"user": 2, "forum": 0, "thread": 0, "post": 0}));

        server.post("/api/service/clear").await.assert_status_ok();
        let response = server.get("/api/service/status").await;
        response.assert_json(&json!({"user": 0, "forum": 0, "thread": 0, "post": 0}));
    }
}
