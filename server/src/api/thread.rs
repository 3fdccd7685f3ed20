use crate::api::doc::THREAD_TAG;
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{Json, Path, Query};
use crate::api::user::non_blank;
use crate::app::AppState;
use crate::model::enums::{PostSort, Voice};
use crate::model::thread::{ThreadChanges, ThreadRef};
use crate::query::Direction;
use crate::query::post::PostOrder;
use crate::resource::post::PostInfo;
use crate::resource::thread::ThreadInfo;
use crate::string::SmallString;
use crate::time::Timer;
use crate::update::post::PostSubmission;
use crate::{api, query, update};
use axum::extract::State;
use axum::http::StatusCode;
use diesel::Connection;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get, update))
        .routes(routes!(create_posts))
        .routes(routes!(list_posts))
        .routes(routes!(vote))
}

/// Retrieves information about an existing thread.
#[utoipa::path(
    get,
    path = "/thread/{slug_or_id}/details",
    tag = THREAD_TAG,
    params(("slug_or_id" = String, Path, description = "Thread id or slug")),
    responses(
        (status = 200, body = ThreadInfo),
        (status = 404, description = "Thread does not exist"),
    ),
)]
async fn get(State(state): State<AppState>, Path(thread_ref): Path<ThreadRef>) -> ApiResult<Json<ThreadInfo>> {
    state.get_connection()?.transaction(|conn| {
        query::thread(conn, &thread_ref)
            .map(ThreadInfo::from)
            .map(Json)
    })
}

/// Request body for updating a thread.
#[derive(Deserialize, ToSchema)]
struct ThreadUpdateBody {
    title: Option<String>,
    message: Option<String>,
}

/// Updates the title and message of an existing thread.
///
/// Absent or blank fields are left unchanged.
#[utoipa::path(
    post,
    path = "/thread/{slug_or_id}/details",
    tag = THREAD_TAG,
    params(("slug_or_id" = String, Path, description = "Thread id or slug")),
    request_body = ThreadUpdateBody,
    responses(
        (status = 200, body = ThreadInfo),
        (status = 400, description = "Body is malformed"),
        (status = 404, description = "Thread does not exist"),
    ),
)]
async fn update(
    State(state): State<AppState>,
    Path(thread_ref): Path<ThreadRef>,
    Json(body): Json<ThreadUpdateBody>,
) -> ApiResult<Json<ThreadInfo>> {
    let changes = ThreadChanges {
        title: non_blank(body.title.as_deref()),
        message: non_blank(body.message.as_deref()),
    };

    state.get_connection()?.transaction(|conn| {
        let thread = query::thread(conn, &thread_ref)?;
        let thread = update::thread::edit(conn, thread, &changes)?;
        Ok(Json(ThreadInfo::from(thread)))
    })
}

/// A single post in a post creation request.
#[derive(Deserialize, ToSchema)]
struct PostCreateBody {
    /// Id of the post being replied to. Zero or absent for a top-level post.
    #[serde(default)]
    parent: i64,
    /// Nickname of the post's author, case insensitive.
    author: SmallString,
    message: String,
}

/// Creates a batch of posts in an existing thread.
///
/// Posts are created all together or not at all, and share the same creation time.
/// Every parent must belong to the same thread.
#[utoipa::path(
    post,
    path = "/thread/{slug_or_id}/create",
    tag = THREAD_TAG,
    params(("slug_or_id" = String, Path, description = "Thread id or slug")),
    request_body = Vec<PostCreateBody>,
    responses(
        (status = 201, body = Vec<PostInfo>),
        (status = 400, description = "Body is malformed"),
        (status = 404, description = "Thread, author or parent post does not exist"),
    ),
)]
async fn create_posts(
    State(state): State<AppState>,
    Path(thread_ref): Path<ThreadRef>,
    Json(body): Json<Vec<PostCreateBody>>,
) -> ApiResult<(StatusCode, Json<Vec<PostInfo>>)> {
    let submissions: Vec<PostSubmission> = body
        .iter()
        .map(|post| PostSubmission {
            parent: post.parent,
            author: &post.author,
            message: &post.message,
        })
        .collect();

    let posts = state.get_connection()?.transaction(|conn| {
        let thread = query::thread(conn, &thread_ref)?;
        update::post::create_posts(conn, &thread, &submissions)
    })?;
    let posts = posts.into_iter().map(PostInfo::from).collect();
    Ok((StatusCode::CREATED, Json(posts)))
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct PostListParams {
    /// Maximum number of posts to return. For `parent_tree`, the maximum number of top-level posts.
    limit: Option<i64>,
    /// Id of the last post of the previous page.
    since: Option<i64>,
    /// One of `flat`, `tree` or `parent_tree`.
    sort: Option<String>,
    /// Reverse the ordering.
    desc: Option<bool>,
}

/// Lists posts of an existing thread.
///
/// See Post-Ordering for the available orderings.
#[utoipa::path(
    get,
    path = "/thread/{slug_or_id}/posts",
    tag = THREAD_TAG,
    params(
        ("slug_or_id" = String, Path, description = "Thread id or slug"),
        PostListParams,
    ),
    responses(
        (status = 200, body = Vec<PostInfo>),
        (status = 400, description = "Query parameter is invalid"),
        (status = 404, description = "Thread does not exist"),
    ),
)]
async fn list_posts(
    State(state): State<AppState>,
    Path(thread_ref): Path<ThreadRef>,
    Query(params): Query<PostListParams>,
) -> ApiResult<Json<Vec<PostInfo>>> {
    let _timer = Timer::new("list_posts");

    let limit = api::page_size(&state.config, params.limit)?;
    if params.since.is_some_and(|since| since < 0) {
        return Err(ApiError::InvalidParam("since"));
    }
    let sort: PostSort = params.sort.as_deref().and_then(|sort| sort.parse().ok()).unwrap_or_default();
    let direction = Direction::new(params.desc.unwrap_or(false));

    state.get_connection()?.transaction(|conn| {
        let thread = query::thread(conn, &thread_ref)?;
        let posts = match PostOrder::new(sort, params.since, |id| query::post::path(conn, id))? {
            Some(order) => query::post::list(conn, thread.id, &order, direction, limit)?,
            None => Vec::new(),
        };
        Ok(Json(posts.into_iter().map(PostInfo::from).collect()))
    })
}

/// Request body for voting on a thread.
#[derive(Deserialize, ToSchema)]
struct VoteBody {
    /// Nickname of the voter, case insensitive.
    nickname: SmallString,
    /// Either 1 or -1.
    voice: i64,
}

/// Votes on an existing thread.
///
/// Each user has at most one vote per thread. Voting again replaces the previous vote.
#[utoipa::path(
    post,
    path = "/thread/{slug_or_id}/vote",
    tag = THREAD_TAG,
    params(("slug_or_id" = String, Path, description = "Thread id or slug")),
    request_body = VoteBody,
    responses(
        (status = 200, body = ThreadInfo),
        (status = 400, description = "Body is malformed or voice is invalid"),
        (status = 404, description = "Thread or user does not exist"),
    ),
)]
async fn vote(
    State(state): State<AppState>,
    Path(thread_ref): Path<ThreadRef>,
    Json(body): Json<VoteBody>,
) -> ApiResult<Json<ThreadInfo>> {
    let voice = Voice::new(body.voice).ok_or(ApiError::InvalidVoice(body.voice))?;

    state.get_connection()?.transaction(|conn| {
        let thread = query::thread(conn, &thread_ref)?;
        let nickname = query::user_nickname(conn, &body.nickname)?;
        let thread = update::vote::cast(conn, thread, &nickname, voice)?;
        Ok(Json(ThreadInfo::from(thread)))
    })
}
