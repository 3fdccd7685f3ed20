use crate::api::doc::POST_TAG;
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{Json, Path, Query};
use crate::app::AppState;
use crate::model::enums::ResourceType;
use crate::model::forum::Forum;
use crate::model::post::Post;
use crate::model::thread::ThreadRef;
use crate::resource::post::{PostDetails, PostInfo, Related, RelatedTable};
use crate::resource::{self, forum::ForumInfo, thread::ThreadInfo, user::UserInfo};
use crate::schema::{forum, post};
use crate::{query, update};
use axum::extract::State;
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(get, update))
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct PostDetailsParams {
    /// Comma separated list of related resources to include: `user`, `thread` and/or `forum`.
    related: Option<String>,
}

/// Retrieves a post, optionally along with its author, thread and forum.
#[utoipa::path(
    get,
    path = "/post/{id}/details",
    tag = POST_TAG,
    params(
        ("id" = i64, Path, description = "Post id"),
        PostDetailsParams,
    ),
    responses(
        (status = 200, body = PostDetails),
        (status = 400, description = "Id is not an integer"),
        (status = 404, description = "Post does not exist"),
    ),
)]
async fn get(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Query(params): Query<PostDetailsParams>,
) -> ApiResult<Json<PostDetails>> {
    let related: RelatedTable = resource::create_table(params.related.as_deref());

    state.get_connection()?.transaction(|conn| {
        let post: Post = post::table
            .find(post_id)
            .select(Post::as_select())
            .first(conn)
            .optional()?
            .ok_or(ApiError::NotFound(ResourceType::Post))?;

        let author = if related[Related::User] {
            Some(query::user(conn, &post.author).map(UserInfo::from)?)
        } else {
            None
        };
        let thread = if related[Related::Thread] {
            Some(query::thread(conn, &ThreadRef::Id(post.thread_id)).map(ThreadInfo::from)?)
        } else {
            None
        };
        let forum = if related[Related::Forum] {
            let forum: Forum = forum::table
                .select(Forum::as_select())
                .filter(forum::slug.eq(&post.forum_slug))
                .first(conn)?;
            Some(ForumInfo::from(forum))
        } else {
            None
        };

        Ok(Json(PostDetails {
            post: PostInfo::from(post),
            author,
            thread,
            forum,
        }))
    })
}

/// Request body for editing a post.
#[derive(Deserialize, ToSchema)]
struct PostUpdateBody {
    /// New message. An absent, blank or unchanged message leaves the post untouched.
    message: Option<String>,
}

/// Edits the message of an existing post.
///
/// The post is marked as edited only if its message actually changes.
#[utoipa::path(
    post,
    path = "/post/{id}/details",
    tag = POST_TAG,
    params(("id" = i64, Path, description = "Post id")),
    request_body = PostUpdateBody,
    responses(
        (status = 200, body = PostInfo),
        (status = 400, description = "Body is malformed"),
        (status = 404, description = "Post does not exist"),
    ),
)]
async fn update(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(body): Json<PostUpdateBody>,
) -> ApiResult<Json<PostInfo>> {
    state.get_connection()?.transaction(|conn| {
        update::post::edit_message(conn, post_id, body.message.as_deref())
            .map(PostInfo::from)
            .map(Json)
    })
}
