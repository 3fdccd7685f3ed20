use crate::api::{ApiError, ApiResult};
use crate::model::enums::ResourceType;
use crate::model::thread::Thread;
use crate::model::user::User;
use crate::query::Direction;
use crate::schema::{forum, forum_user, thread, user};
use crate::string::SmallString;
use crate::time::DateTime;
use diesel::prelude::*;

/// Returns the slug of the forum identified case-insensitively by `slug`, spelled as it was created.
pub fn slug(conn: &mut PgConnection, slug: &str) -> ApiResult<SmallString> {
    forum::table
        .select(forum::slug)
        .filter(forum::slug.eq(slug))
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound(ResourceType::Forum))
}

/// Lists threads of the forum `forum_slug` by creation time.
/// `since` is inclusive: threads created exactly at `since` are part of the page.
pub fn threads(
    conn: &mut PgConnection,
    forum_slug: &str,
    since: Option<DateTime>,
    direction: Direction,
    limit: i64,
) -> QueryResult<Vec<Thread>> {
    let mut query = thread::table
        .select(Thread::as_select())
        .filter(thread::forum_slug.eq(forum_slug))
        .into_boxed();
    match direction {
        Direction::Ascending => {
            if let Some(since) = since {
                query = query.filter(thread::created.ge(since));
            }
            query = query.order((thread::created.asc(), thread::id.asc()));
        }
        Direction::Descending => {
            if let Some(since) = since {
                query = query.filter(thread::created.le(since));
            }
            query = query.order((thread::created.desc(), thread::id.desc()));
        }
    }
    query.limit(limit).load(conn)
}

/// Lists users who have created a thread or post in the forum `forum_slug`, by nickname.
/// `since` is exclusive.
pub fn users(
    conn: &mut PgConnection,
    forum_slug: &str,
    since: Option<&str>,
    direction: Direction,
    limit: i64,
) -> QueryResult<Vec<User>> {
    let mut query = forum_user::table
        .inner_join(user::table.on(user::nickname.eq(forum_user::nickname)))
        .select(User::as_select())
        .filter(forum_user::forum_slug.eq(forum_slug))
        .into_boxed();
    match direction {
        Direction::Ascending => {
            if let Some(since) = since {
                query = query.filter(user::nickname.gt(since));
            }
            query = query.order(user::nickname.asc());
        }
        Direction::Descending => {
            if let Some(since) = since {
                query = query.filter(user::nickname.lt(since));
            }
            query = query.order(user::nickname.desc());
        }
    }
    query.limit(limit).load(conn)
}
