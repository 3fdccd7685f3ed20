use crate::api::{ApiError, ApiResult};
use crate::model::enums::ResourceType;
use crate::model::thread::{Thread, ThreadRef};
use crate::model::user::User;
use crate::schema::user;
use crate::string::SmallString;
use diesel::prelude::*;

pub mod forum;
pub mod post;

/// Sort direction of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn new(desc: bool) -> Self {
        match desc {
            true => Self::Descending,
            false => Self::Ascending,
        }
    }
}

/// Retrieves the thread identified by `thread_ref`.
pub fn thread(conn: &mut PgConnection, thread_ref: &ThreadRef) -> ApiResult<Thread> {
    thread_ref
        .get(conn)?
        .ok_or(ApiError::NotFound(ResourceType::Thread))
}

/// Retrieves the user identified case-insensitively by `nickname`.
pub fn user(conn: &mut PgConnection, nickname: &str) -> ApiResult<User> {
    user::table
        .select(User::as_select())
        .filter(user::nickname.eq(nickname))
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound(ResourceType::User))
}

/// Returns the nickname of the user identified case-insensitively by `nickname`, spelled as it was registered.
pub fn user_nickname(conn: &mut PgConnection, nickname: &str) -> ApiResult<SmallString> {
    user::table
        .select(user::nickname)
        .filter(user::nickname.eq(nickname))
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound(ResourceType::User))
}
