use crate::api::error::ErrorResponse;
use utoipa::OpenApi;

pub const FORUM_TAG: &str = "Forum";
pub const POST_TAG: &str = "Post";
pub const SERVICE_TAG: &str = "Service";
pub const THREAD_TAG: &str = "Thread";
pub const USER_TAG: &str = "User";

#[derive(OpenApi)]
#[openapi(
    info(title = "Forum", description = "Forum with nested comments, served over a JSON API."),
    servers((url = "/api")),
    components(schemas(ErrorResponse)),
    tags(
        (name = FORUM_TAG, description = "Forum API endpoints"),
        (name = POST_TAG, description = "Post API endpoints"),
        (name = SERVICE_TAG, description = "Service API endpoints"),
        (name = THREAD_TAG, description = "Thread API endpoints"),
        (name = USER_TAG, description = "User API endpoints"),
        (name = "Pagination", description = PAGINATION_DESCRIPTION),
        (name = "Post-Ordering", description = POST_ORDERING_DESCRIPTION),
        (name = "Errors", description = ERROR_DESCRIPTION),
    )
)]
pub struct ApiDoc;

const PAGINATION_DESCRIPTION: &str = r#"
List endpoints accept `limit`, `since` and `desc` query parameters. `limit` is
a non-negative integer that defaults to the server's configured page size.
`desc=true` reverses the ordering. `since` is a cursor: pass the last element
of one page to receive the next.

The meaning of `since` depends on the endpoint:

- Forum threads: a creation timestamp, inclusive.
- Forum users: a nickname, exclusive.
- Thread posts: a post id, exclusive.
"#;

const POST_ORDERING_DESCRIPTION: &str = r#"
Posts of a thread can be listed in three orders, selected with the `sort`
query parameter:

- `flat` (default): chronological, ties broken by id.
- `tree`: depth-first. Every post is followed by all of its replies, replies
  are ordered by id. With `desc=true` the order is exactly reversed.
- `parent_tree`: like `tree`, but `limit` counts top-level posts rather than
  rows. A page contains complete comment trees. With `desc=true` the
  top-level posts are ordered from newest to oldest while each tree keeps
  its ascending depth-first order.

Unrecognized `sort` values are treated as `flat`.
"#;

const ERROR_DESCRIPTION: &str = r#"
All errors are returned with an appropriate status code and a JSON body of the
form:

```json5
{
    "name": "<error name>",
    "message": "<error description>"
}
```

Notable error names include:

- `UserNotFound`, `ForumNotFound`, `ThreadNotFound`, `PostNotFound`
- `ParentPostNotFound`: a new post replies to a post outside its thread
- `ForumAlreadyExists`, `ThreadAlreadyExists`, `UserAlreadyExists`, `VoteAlreadyExists`
- `InvalidParam`: a malformed query or path parameter
- `BadInput`: a malformed value in the request body
"#;
