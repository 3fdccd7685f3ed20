use crate::api::{ApiError, ApiResult, error};
use crate::query;
use crate::model::enums::{ResourceProperty, ResourceType};
use crate::model::user::{NewUser, User, UserChanges};
use crate::schema::user;
use diesel::prelude::*;

/// Outcome of creating a user.
pub enum UserCreation {
    Created(User),
    /// Existing users whose nickname or email clash with the new user.
    Conflict(Vec<User>),
}

/// Creates `new_user` unless its nickname or email is already taken.
pub fn create(conn: &mut PgConnection, new_user: &NewUser) -> QueryResult<UserCreation> {
    let created = new_user
        .insert_into(user::table)
        .on_conflict_do_nothing()
        .returning(User::as_returning())
        .get_result(conn)
        .optional()?;
    if let Some(user) = created {
        return Ok(UserCreation::Created(user));
    }

    user::table
        .select(User::as_select())
        .filter(user::nickname.eq(new_user.nickname))
        .or_filter(user::email.eq(new_user.email))
        .order_by(user::id)
        .load(conn)
        .map(UserCreation::Conflict)
}

/// Applies `changes` to the profile of the user `nickname`.
pub fn update(conn: &mut PgConnection, nickname: &str, changes: &UserChanges) -> ApiResult<User> {
    if changes.is_empty() {
        return query::user(conn, nickname);
    }

    let update_result = diesel::update(user::table)
        .filter(user::nickname.eq(nickname))
        .set(changes)
        .returning(User::as_returning())
        .get_result(conn)
        .optional();
    let updated_user = error::map_unique_violation(update_result, ResourceProperty::UserEmail)?;
    updated_user.ok_or(ApiError::NotFound(ResourceType::User))
}
