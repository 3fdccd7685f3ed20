use crate::model::thread::Thread;
use crate::string::SmallString;
use crate::time::DateTime;
use serde::Serialize;
use serde_with::skip_serializing_none;
use server_macros::skipped_options;
use utoipa::ToSchema;

/// A discussion thread.
#[skipped_options]
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct ThreadInfo {
    id: i64,
    title: String,
    /// Nickname of the thread's author.
    author: SmallString,
    /// Slug of the forum the thread belongs to.
    forum: SmallString,
    message: String,
    /// Sum of all votes cast on the thread.
    votes: i64,
    /// Optional human-readable identifier.
    slug: Option<SmallString>,
    created: DateTime,
}

impl From<Thread> for ThreadInfo {
    fn from(thread: Thread) -> Self {
        Self {
            id: thread.id,
            title: thread.title,
            author: thread.author,
            forum: thread.forum_slug,
            message: thread.message,
            votes: thread.votes,
            slug: thread.slug,
            created: thread.created,
        }
    }
}
