pub mod forum;
pub mod post;
pub mod thread;
pub mod user;
pub mod vote;

use diesel::prelude::*;

// NOTE: The functions in this module perform several statements each. Unless otherwise
// stated, run them inside a transaction so that a failure leaves nothing behind.

/// Outcome of creating a resource with a unique identifier.
#[derive(Debug)]
pub enum Creation<T> {
    Created(T),
    /// The identifier was taken. Holds the resource that owns it.
    AlreadyExists(T),
}

/// Removes every row from every table.
pub fn clear_all(conn: &mut PgConnection) -> QueryResult<()> {
    diesel::sql_query("TRUNCATE TABLE vote, post, forum_user, thread, forum, \"user\" RESTART IDENTITY CASCADE;")
        .execute(conn)
        .map(|_| ())
}
