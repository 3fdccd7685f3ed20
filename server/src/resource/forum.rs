use crate::model::forum::Forum;
use crate::string::SmallString;
use serde::Serialize;
use utoipa::ToSchema;

/// A forum together with its statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct ForumInfo {
    title: String,
    /// Nickname of the user that owns the forum.
    user: SmallString,
    slug: SmallString,
    /// Number of posts across all threads of the forum.
    posts: i64,
    /// Number of threads in the forum.
    threads: i64,
}

impl From<Forum> for ForumInfo {
    fn from(forum: Forum) -> Self {
        Self {
            title: forum.title,
            user: forum.owner,
            slug: forum.slug,
            posts: forum.post_count,
            threads: forum.thread_count,
        }
    }
}
