use crate::model::post::Post;
use crate::resource::BoolFill;
use crate::resource::forum::ForumInfo;
use crate::resource::thread::ThreadInfo;
use crate::resource::user::UserInfo;
use crate::string::SmallString;
use crate::time::DateTime;
use serde::Serialize;
use serde_with::skip_serializing_none;
use server_macros::skipped_options;
use std::ops::{Index, IndexMut};
use strum::EnumString;
use utoipa::ToSchema;

/// Resources that can be returned alongside a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Related {
    User,
    Thread,
    Forum,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelatedTable {
    user: bool,
    thread: bool,
    forum: bool,
}

impl BoolFill for RelatedTable {
    fn filled(val: bool) -> Self {
        Self {
            user: val,
            thread: val,
            forum: val,
        }
    }
}

impl Index<Related> for RelatedTable {
    type Output = bool;
    fn index(&self, index: Related) -> &Self::Output {
        match index {
            Related::User => &self.user,
            Related::Thread => &self.thread,
            Related::Forum => &self.forum,
        }
    }
}

impl IndexMut<Related> for RelatedTable {
    fn index_mut(&mut self, index: Related) -> &mut Self::Output {
        match index {
            Related::User => &mut self.user,
            Related::Thread => &mut self.thread,
            Related::Forum => &mut self.forum,
        }
    }
}

/// A single post in a thread.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostInfo {
    id: i64,
    /// Id of the post this one replies to, or 0 for a top-level post.
    parent: i64,
    author: SmallString,
    message: String,
    /// Whether the message has been changed since creation.
    is_edited: bool,
    /// Slug of the forum the post's thread belongs to.
    forum: SmallString,
    /// Id of the thread the post belongs to.
    thread: i64,
    created: DateTime,
}

impl From<Post> for PostInfo {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            parent: post.parent,
            author: post.author,
            message: post.message,
            is_edited: post.is_edited,
            forum: post.forum_slug,
            thread: post.thread_id,
            created: post.created,
        }
    }
}

/// A post together with the related resources that were asked for.
#[skipped_options]
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct PostDetails {
    pub post: PostInfo,
    pub author: Option<UserInfo>,
    pub thread: Option<ThreadInfo>,
    pub forum: Option<ForumInfo>,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resource;

    #[test]
    fn related_selection() {
        let table: RelatedTable = resource::create_table(Some("user,forum"));
        assert!(table[Related::User]);
        assert!(!table[Related::Thread]);
        assert!(table[Related::Forum]);

        let table: RelatedTable = resource::create_table(Some(""));
        assert_eq!(table, RelatedTable::filled(false));

        let table: RelatedTable = resource::create_table(None);
        assert_eq!(table, RelatedTable::filled(false));

        let table: RelatedTable = resource::create_table(Some("thread,unknown,,user"));
        assert!(table[Related::Thread] && table[Related::User] && !table[Related::Forum]);
    }
}
