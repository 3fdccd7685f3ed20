use crate::api::{ApiError, ApiResult};
use crate::model::enums::ResourceProperty;
use crate::model::forum::{Forum, NewForum};
use crate::model::thread::{NewThread, Thread};
use crate::schema::{forum, thread};
use crate::time::DateTime;
use crate::{query, update::Creation};
use diesel::prelude::*;

/// Creates a forum owned by the user `owner`.
///
/// If the slug is taken, the forum that owns it is returned instead.
pub fn create(conn: &mut PgConnection, title: &str, owner: &str, slug: &str) -> ApiResult<Creation<Forum>> {
    let owner = query::user_nickname(conn, owner)?;
    let new_forum = NewForum {
        title,
        owner: &owner,
        slug,
    };
    let created = new_forum
        .insert_into(forum::table)
        .on_conflict_do_nothing()
        .returning(Forum::as_returning())
        .get_result(conn)
        .optional()?;
    match created {
        Some(forum) => Ok(Creation::Created(forum)),
        None => forum::table
            .select(Forum::as_select())
            .filter(forum::slug.eq(slug))
            .first(conn)
            .optional()?
            .map(Creation::AlreadyExists)
            .ok_or(ApiError::AlreadyExists(ResourceProperty::ForumSlug)),
    }
}

/// Parameters of a new thread.
pub struct ThreadSubmission<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub message: &'a str,
    pub slug: Option<&'a str>,
    pub created: Option<DateTime>,
}

/// Creates a thread in the forum `forum_slug`.
///
/// If the thread's slug is taken, the thread that owns it is returned instead.
pub fn create_thread(
    conn: &mut PgConnection,
    forum_slug: &str,
    submission: &ThreadSubmission,
) -> ApiResult<Creation<Thread>> {
    let author = query::user_nickname(conn, submission.author)?;
    let forum_slug = query::forum::slug(conn, forum_slug)?;
    let new_thread = NewThread {
        title: submission.title,
        author: &author,
        forum_slug: &forum_slug,
        message: submission.message,
        slug: submission.slug,
        created: submission.created.unwrap_or_else(DateTime::now),
    };
    let created = new_thread
        .insert_into(thread::table)
        .on_conflict_do_nothing()
        .returning(Thread::as_returning())
        .get_result(conn)
        .optional()?;
    if let Some(thread) = created {
        return Ok(Creation::Created(thread));
    }

    let existing = match submission.slug {
        Some(slug) => thread::table
            .select(Thread::as_select())
            .filter(thread::slug.eq(slug))
            .first(conn)
            .optional()?,
        None => None,
    };
    existing
        .map(Creation::AlreadyExists)
        .ok_or(ApiError::AlreadyExists(ResourceProperty::ThreadSlug))
}
