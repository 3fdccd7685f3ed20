use crate::api::doc::FORUM_TAG;
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{Json, Path, Query};
use crate::app::AppState;
use crate::model::enums::ResourceType;
use crate::model::forum::Forum;
use crate::query::Direction;
use crate::resource::forum::ForumInfo;
use crate::resource::thread::ThreadInfo;
use crate::resource::user::UserInfo;
use crate::schema::forum;
use crate::string::SmallString;
use crate::time::DateTime;
use crate::update::Creation;
use crate::update::forum::ThreadSubmission;
use crate::{api, query, update};
use axum::extract::State;
use axum::http::StatusCode;
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create))
        .routes(routes!(get))
        .routes(routes!(create_thread))
        .routes(routes!(list_threads))
        .routes(routes!(list_users))
}

/// Request body for creating a forum.
#[derive(Deserialize, ToSchema)]
struct ForumCreateBody {
    title: String,
    /// Nickname of the forum's owner, case insensitive.
    user: SmallString,
    /// Unique identifier of the forum, case insensitive.
    slug: SmallString,
}

/// Creates a new forum.
///
/// If the slug is taken, the forum that owns it is returned instead.
#[utoipa::path(
    post,
    path = "/forum/create",
    tag = FORUM_TAG,
    request_body = ForumCreateBody,
    responses(
        (status = 201, body = ForumInfo),
        (status = 400, description = "Body is malformed"),
        (status = 404, description = "Owner does not exist"),
        (status = 409, description = "Slug is used by an existing forum", body = ForumInfo),
    ),
)]
async fn create(
    State(state): State<AppState>,
    Json(body): Json<ForumCreateBody>,
) -> ApiResult<(StatusCode, Json<ForumInfo>)> {
    let creation = state
        .get_connection()?
        .transaction(|conn| update::forum::create(conn, &body.title, &body.user, &body.slug))?;
    Ok(created_or_conflict(creation, ForumInfo::from))
}

/// Retrieves information about an existing forum.
#[utoipa::path(
    get,
    path = "/forum/{slug}/details",
    tag = FORUM_TAG,
    params(("slug" = String, Path, description = "Forum slug, case insensitive")),
    responses(
        (status = 200, body = ForumInfo),
        (status = 404, description = "Forum does not exist"),
    ),
)]
async fn get(State(state): State<AppState>, Path(slug): Path<SmallString>) -> ApiResult<Json<ForumInfo>> {
    state.get_connection()?.transaction(|conn| {
        forum::table
            .select(Forum::as_select())
            .filter(forum::slug.eq(&slug))
            .first(conn)
            .optional()?
            .ok_or(ApiError::NotFound(ResourceType::Forum))
            .map(ForumInfo::from)
            .map(Json)
    })
}

/// Request body for creating a thread.
#[derive(Deserialize, ToSchema)]
struct ThreadCreateBody {
    title: String,
    /// Nickname of the thread's author, case insensitive.
    author: SmallString,
    message: String,
    /// Optional unique identifier of the thread. Empty slugs are ignored.
    slug: Option<SmallString>,
    /// Creation time. Defaults to the current time.
    created: Option<DateTime>,
}

/// Creates a new thread in an existing forum.
///
/// If the thread's slug is taken, the thread that owns it is returned instead.
#[utoipa::path(
    post,
    path = "/forum/{slug}/create",
    tag = FORUM_TAG,
    params(("slug" = String, Path, description = "Forum slug, case insensitive")),
    request_body = ThreadCreateBody,
    responses(
        (status = 201, body = ThreadInfo),
        (status = 400, description = "Body is malformed"),
        (status = 404, description = "Forum or author does not exist"),
        (status = 409, description = "Slug is used by an existing thread", body = ThreadInfo),
    ),
)]
async fn create_thread(
    State(state): State<AppState>,
    Path(slug): Path<SmallString>,
    Json(body): Json<ThreadCreateBody>,
) -> ApiResult<(StatusCode, Json<ThreadInfo>)> {
    let submission = ThreadSubmission {
        title: &body.title,
        author: &body.author,
        message: &body.message,
        slug: body.slug.as_deref().filter(|slug| !slug.is_empty()),
        created: body.created.map(DateTime::truncated),
    };

    let creation = state
        .get_connection()?
        .transaction(|conn| update::forum::create_thread(conn, &slug, &submission))?;
    Ok(created_or_conflict(creation, ThreadInfo::from))
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct ThreadListParams {
    /// Maximum number of threads to return.
    limit: Option<i64>,
    /// Only threads created at this time or later (earlier if `desc` is set).
    since: Option<DateTime>,
    /// List newest threads first.
    desc: Option<bool>,
}

/// Lists threads of a forum by creation time.
#[utoipa::path(
    get,
    path = "/forum/{slug}/threads",
    tag = FORUM_TAG,
    params(
        ("slug" = String, Path, description = "Forum slug, case insensitive"),
        ThreadListParams,
    ),
    responses(
        (status = 200, body = Vec<ThreadInfo>),
        (status = 400, description = "Query parameter is invalid"),
        (status = 404, description = "Forum does not exist"),
    ),
)]
async fn list_threads(
    State(state): State<AppState>,
    Path(slug): Path<SmallString>,
    Query(params): Query<ThreadListParams>,
) -> ApiResult<Json<Vec<ThreadInfo>>> {
    let limit = api::page_size(&state.config, params.limit)?;
    let direction = Direction::new(params.desc.unwrap_or(false));

    state.get_connection()?.transaction(|conn| {
        let forum_slug = query::forum::slug(conn, &slug)?;
        let threads = query::forum::threads(conn, &forum_slug, params.since, direction, limit)?;
        Ok(Json(threads.into_iter().map(ThreadInfo::from).collect()))
    })
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct UserListParams {
    /// Maximum number of users to return.
    limit: Option<i64>,
    /// Only users whose nickname follows this one (precedes it if `desc` is set).
    since: Option<SmallString>,
    /// List users in reverse order.
    desc: Option<bool>,
}

/// Lists users who have created a thread or post in a forum, ordered by nickname.
#[utoipa::path(
    get,
    path = "/forum/{slug}/users",
    tag = FORUM_TAG,
    params(
        ("slug" = String, Path, description = "Forum slug, case insensitive"),
        UserListParams,
    ),
    responses(
        (status = 200, body = Vec<UserInfo>),
        (status = 400, description = "Query parameter is invalid"),
        (status = 404, description = "Forum does not exist"),
    ),
)]
async fn list_users(
    State(state): State<AppState>,
    Path(slug): Path<SmallString>,
    Query(params): Query<UserListParams>,
) -> ApiResult<Json<Vec<UserInfo>>> {
    let limit = api::page_size(&state.config, params.limit)?;
    let direction = Direction::new(params.desc.unwrap_or(false));

    state.get_connection()?.transaction(|conn| {
        let forum_slug = query::forum::slug(conn, &slug)?;
        let users = query::forum::users(conn, &forum_slug, params.since.as_deref(), direction, limit)?;
        Ok(Json(users.into_iter().map(UserInfo::from).collect()))
    })
}

/// Responds with 201 for a newly created resource and 409 for the one that was already there.
fn created_or_conflict<T, R>(creation: Creation<T>, info: impl FnOnce(T) -> R) -> (StatusCode, Json<R>) {
    match creation {
        Creation::Created(resource) => (StatusCode::CREATED, Json(info(resource))),
        Creation::AlreadyExists(resource) => (StatusCode::CONFLICT, Json(info(resource))),
    }
}

#[cfg(test)]
mod test {
    use crate::test::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    #[ignore = "requires a running PostgreSQL database"]
    async fn create_forum() {
        let server = test_server();
        reset_database();
        create_user_over_http(&server, "Owner").await;

        let body = json!({"title": "Pirates", "user": "owner", "slug": "Pirates-Forum"});
        let response = server.post("/api/forum/create").json(&body).await;
        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({
            "title": "Pirates",
            "user": "Owner",
            "slug": "Pirates-Forum",
            "posts": 0,
            "threads": 0,
        }));

        let clash = json!({"title": "Other", "user": "Owner", "slug": "pirates-forum"});
        let response = server.post("/api/forum/create").json(&clash).await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["title"], "Pirates");

        let orphan = json!({"title": "Orphan", "user": "nobody", "slug": "orphan"});
        let response = server.post("/api/forum/create").json(&orphan).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["name"], "UserNotFound");

        let response = server.get("/api/forum/PIRATES-FORUM/details").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["slug"], "Pirates-Forum");
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a running PostgreSQL database"]
    async fn thread_listing() {
        let server = test_server();
        reset_database();
        create_user_over_http(&server, "author").await;
        let forum = json!({"title": "Forum", "user": "author", "slug": "forum"});
        server.post("/api/forum/create").json(&forum).await.assert_status(StatusCode::CREATED);

        for (index, created) in ["2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", "2024-01-03T00:00:00Z"]
            .into_iter()
            .enumerate()
        {
            let body = json!({
                "title": format!("Thread {index}"),
                "author": "AUTHOR",
                "message": "Text",
                "slug": format!("thread-{index}"),
                "created": created,
            });
            let response = server.post("/api/forum/forum/create").json(&body).await;
            response.assert_status(StatusCode::CREATED);
            let thread = response.json::<Value>();
            assert_eq!(thread["author"], "author");
            assert_eq!(thread["forum"], "forum");
        }

        let duplicate = json!({"title": "Again", "author": "author", "message": "Text", "slug": "THREAD-0"});
        let response = server.post("/api/forum/forum/create").json(&duplicate).await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["title"], "Thread 0");

        let slugs = |threads: Vec<Value>| -> Vec<Value> { threads.into_iter().map(|t| t["slug"].clone()).collect() };
        let response = server.get("/api/forum/forum/threads?since=2024-01-02T00:00:00Z").await;
        assert_eq!(slugs(response.json()), [json!("thread-1"), json!("thread-2")]);

        let response = server.get("/api/forum/forum/threads?since=2024-01-02T00:00:00Z&desc=true").await;
        assert_eq!(slugs(response.json()), [json!("thread-1"), json!("thread-0")]);

        let response = server.get("/api/forum/forum/threads?limit=1&desc=true").await;
        assert_eq!(slugs(response.json()), [json!("thread-2")]);

        server
            .get("/api/forum/forum/threads?limit=-1")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get("/api/forum/missing/threads")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a running PostgreSQL database"]
    async fn user_listing() {
        let server = test_server();
        reset_database();
        for nickname in ["carol", "Alice", "bob", "outsider"] {
            create_user_over_http(&server, nickname).await;
        }
        let forum = json!({"title": "Forum", "user": "outsider", "slug": "forum"});
        server.post("/api/forum/create").json(&forum).await.assert_status(StatusCode::CREATED);
        for (author, slug) in [("carol", "c"), ("alice", "a"), ("BOB", "b")] {
            let body = json!({"title": "Thread", "author": author, "message": "Text", "slug": slug});
            server.post("/api/forum/forum/create").json(&body).await.assert_status(StatusCode::CREATED);
        }

        let nicknames = |users: Vec<Value>| -> Vec<Value> { users.into_iter().map(|u| u["nickname"].clone()).collect() };
        let response = server.get("/api/forum/forum/users").await;
        assert_eq!(nicknames(response.json()), [json!("Alice"), json!("bob"), json!("carol")]);

        let response = server.get("/api/forum/forum/users?since=alice").await;
        assert_eq!(nicknames(response.json()), [json!("bob"), json!("carol")]);

        let response = server.get("/api/forum/forum/users?since=carol&desc=true&limit=1").await;
        assert_eq!(nicknames(response.json()), [json!("bob")]);
    }
}
