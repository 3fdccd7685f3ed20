use crate::model::user::User;
use crate::string::SmallString;
use serde::Serialize;
use utoipa::ToSchema;

/// A registered user.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    /// Unique, case-insensitive public identifier.
    nickname: SmallString,
    fullname: String,
    about: String,
    /// Unique, case-insensitive email address.
    email: SmallString,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            nickname: user.nickname,
            fullname: user.fullname,
            about: user.about,
            email: user.email,
        }
    }
}
