use crate::model::thread::{Thread, ThreadChanges};
use crate::schema::thread;
use diesel::prelude::*;

/// Applies `changes` to `thread`. Returns the thread unchanged if there is nothing to change.
pub fn edit(conn: &mut PgConnection, thread: Thread, changes: &ThreadChanges) -> QueryResult<Thread> {
    if changes.is_empty() {
        return Ok(thread);
    }
    diesel::update(thread::table.find(thread.id))
        .set(changes)
        .returning(Thread::as_returning())
        .get_result(conn)
}
