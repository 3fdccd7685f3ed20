use crate::api::{ApiError, ApiResult, error};
use crate::model::enums::ResourceType;
use crate::model::post::{NewPost, Post, PostPath};
use crate::model::thread::Thread;
use crate::schema::{post, user};
use crate::string::SmallString;
use crate::time::DateTime;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use std::collections::HashMap;

/// A post as submitted by a client, before it has been validated.
#[derive(Debug, Clone, Copy)]
pub struct PostSubmission<'a> {
    /// Id of the post being replied to, or 0 for a top-level post.
    pub parent: i64,
    pub author: &'a str,
    pub message: &'a str,
}

/// Creates a batch of posts in `thread`.
///
/// Every post shares the same creation time. Authors and parents are validated in submission
/// order before anything is written, so the first invalid post determines the error. Must be
/// run inside a transaction for the batch to be atomic.
pub fn create_posts(conn: &mut PgConnection, thread: &Thread, submissions: &[PostSubmission]) -> ApiResult<Vec<Post>> {
    if submissions.is_empty() {
        return Ok(Vec::new());
    }

    let created = DateTime::now();
    let authors = author_nicknames(conn, submissions)?;
    let parent_paths = parent_paths(conn, thread.id, submissions)?;
    let validated_posts = validate(submissions, &authors, &parent_paths)?;

    let ids = reserve_ids(conn, submissions.len())?;
    let new_posts = assemble(thread, created, validated_posts, ids);
    let insert_result = diesel::insert_into(post::table)
        .values(&new_posts)
        .returning(Post::as_returning())
        .get_results(conn);
    let mut posts: Vec<Post> = error::map_foreign_key_violation(insert_result, ResourceType::User)?;
    posts.sort_unstable_by_key(|post| post.id);
    Ok(posts)
}

/// Updates the message of the post with id `post_id`.
///
/// A blank message or one identical to the current message leaves the post untouched.
/// Otherwise the post is marked as edited.
pub fn edit_message(conn: &mut PgConnection, post_id: i64, message: Option<&str>) -> ApiResult<Post> {
    let post: Post = post::table
        .find(post_id)
        .select(Post::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound(ResourceType::Post))?;

    match message {
        Some(message) if !message.trim().is_empty() && message != post.message => {
            diesel::update(post::table.find(post_id))
                .set((post::message.eq(message), post::is_edited.eq(true)))
                .returning(Post::as_returning())
                .get_result(conn)
                .map_err(ApiError::from)
        }
        _ => Ok(post),
    }
}

/// A submission whose author and parent are known to exist.
#[derive(Debug)]
struct ValidatedPost<'a> {
    parent: i64,
    parent_path: Option<&'a PostPath>,
    author: SmallString,
    message: &'a str,
}

#[derive(QueryableByName)]
struct ReservedId {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

/// Maps lowercase nicknames of the submitting authors that exist onto their registered spelling.
fn author_nicknames(
    conn: &mut PgConnection,
    submissions: &[PostSubmission],
) -> QueryResult<HashMap<SmallString, SmallString>> {
    let mut requested: Vec<SmallString> = submissions
        .iter()
        .map(|submission| SmallString::new(submission.author))
        .collect();
    requested.sort_unstable();
    requested.dedup();

    let nicknames: Vec<SmallString> = user::table
        .select(user::nickname)
        .filter(user::nickname.eq_any(requested))
        .load(conn)?;
    Ok(nicknames
        .into_iter()
        .map(|nickname| (nickname.to_lowercase(), nickname))
        .collect())
}

/// Maps ids of the requested parents that exist in the thread `thread_id` onto their paths.
fn parent_paths(
    conn: &mut PgConnection,
    thread_id: i64,
    submissions: &[PostSubmission],
) -> QueryResult<HashMap<i64, PostPath>> {
    let mut parents: Vec<i64> = submissions
        .iter()
        .map(|submission| submission.parent)
        .filter(|&parent| parent != 0)
        .collect();
    if parents.is_empty() {
        return Ok(HashMap::new());
    }
    parents.sort_unstable();
    parents.dedup();

    post::table
        .select((post::id, post::path))
        .filter(post::thread_id.eq(thread_id))
        .filter(post::id.eq_any(parents))
        .load::<(i64, PostPath)>(conn)
        .map(|rows| rows.into_iter().collect())
}

/// Checks submissions in order, failing on the first one with an unknown author or a parent outside the thread.
fn validate<'a>(
    submissions: &[PostSubmission<'a>],
    authors: &HashMap<SmallString, SmallString>,
    parent_paths: &'a HashMap<i64, PostPath>,
) -> ApiResult<Vec<ValidatedPost<'a>>> {
    submissions
        .iter()
        .map(|submission| -> ApiResult<ValidatedPost<'a>> {
            let author = authors
                .get(&SmallString::new(submission.author).to_lowercase())
                .cloned()
                .ok_or(ApiError::NotFound(ResourceType::User))?;
            let parent_path = match submission.parent {
                0 => None,
                parent => Some(
                    parent_paths
                        .get(&parent)
                        .ok_or(ApiError::NotFound(ResourceType::ParentPost))?,
                ),
            };
            Ok(ValidatedPost {
                parent: submission.parent,
                parent_path,
                author,
                message: submission.message,
            })
        })
        .collect()
}

/// Reserves `count` ids from the post id sequence, in ascending order.
fn reserve_ids(conn: &mut PgConnection, count: usize) -> QueryResult<Vec<i64>> {
    let mut ids: Vec<i64> = diesel::sql_query(
        "SELECT nextval(pg_get_serial_sequence('post', 'id')) AS id
         FROM generate_series(1, $1);",
    )
    .bind::<BigInt, _>(count as i64)
    .load::<ReservedId>(conn)?
    .into_iter()
    .map(|reserved| reserved.id)
    .collect();
    ids.sort_unstable();
    Ok(ids)
}

/// Pairs each validated post with a reserved id and computes its path.
fn assemble(thread: &Thread, created: DateTime, validated_posts: Vec<ValidatedPost>, ids: Vec<i64>) -> Vec<NewPost> {
    validated_posts
        .into_iter()
        .zip(ids)
        .map(|(validated, id)| NewPost {
            id,
            parent: validated.parent,
            author: validated.author,
            message: validated.message.to_owned(),
            forum_slug: thread.forum_slug.clone(),
            thread_id: thread.id,
            created,
            path: match validated.parent_path {
                Some(parent_path) => parent_path.child(id),
                None => PostPath::root(id),
            },
        })
        .collect()
}
