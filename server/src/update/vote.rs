use crate::api::{ApiResult, error};
use crate::model::enums::{ResourceProperty, ResourceType, Voice};
use crate::model::thread::Thread;
use crate::model::vote::{NewVote, Vote};
use crate::schema::{thread, vote};
use diesel::prelude::*;

/// Records `nickname`'s vote on `thread` and returns the thread with its updated vote total.
///
/// A user has at most one vote per thread; voting again replaces the previous voice. The stored
/// total is maintained by database triggers. Must be run inside a transaction.
pub fn cast(conn: &mut PgConnection, mut thread: Thread, nickname: &str, voice: Voice) -> ApiResult<Thread> {
    let previous_vote: Option<Vote> = vote::table
        .select(Vote::as_select())
        .filter(vote::thread_id.eq(thread.id))
        .filter(vote::nickname.eq(nickname))
        .for_update()
        .first(conn)
        .optional()?;

    match previous_vote {
        Some(previous) if previous.voice == voice => Ok(thread),
        Some(previous) => {
            diesel::update(vote::table)
                .filter(vote::thread_id.eq(previous.thread_id))
                .filter(vote::nickname.eq(&previous.nickname))
                .set(vote::voice.eq(voice))
                .execute(conn)?;
            thread::table
                .find(thread.id)
                .select(Thread::as_select())
                .first(conn)
                .map_err(Into::into)
        }
        None => {
            let new_vote = NewVote {
                nickname,
                thread_id: thread.id,
                voice,
            };
            let insert_result = new_vote.insert_into(vote::table).execute(conn);
            error::map_unique_or_foreign_key_violation(insert_result, ResourceProperty::Vote, ResourceType::User)?;

            thread.votes += voice.value();
            Ok(thread)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::ApiError;
    use crate::test::*;
    use serial_test::parallel;

    #[test]
    #[parallel]
    #[ignore = "requires a running PostgreSQL database"]
    fn repeated_votes() {
        test_transaction(|conn| {
            let (user, thread) = create_test_discussion(conn, "repeat_voter")?;

            let thread = cast(conn, thread, &user.nickname, Voice::Up)?;
            assert_eq!(thread.votes, 1);
            let thread = cast(conn, thread, &user.nickname, Voice::Up)?;
            assert_eq!(thread.votes, 1);

            let before = thread.votes;
            let thread = cast(conn, thread, &user.nickname, Voice::Down)?;
            assert_eq!(thread.votes - before, -2);

            let stored: i64 = thread::table
                .find(thread.id)
                .select(thread::votes)
                .first(conn)?;
            assert_eq!(stored, -1);
            Ok(())
        });
    }

    #[test]
    #[parallel]
    #[ignore = "requires a running PostgreSQL database"]
    fn votes_from_many_users() {
        test_transaction(|conn| {
            let (user, thread) = create_test_discussion(conn, "first_voter")?;
            let other = create_test_user(conn, "second_voter")?;

            let thread = cast(conn, thread, &user.nickname, Voice::Down)?;
            let thread = cast(conn, thread, &other.nickname, Voice::Down)?;
            assert_eq!(thread.votes, -2);

            let votes: Vec<Vote> = vote::table
                .select(Vote::as_select())
                .filter(vote::thread_id.eq(thread.id))
                .order_by(vote::nickname)
                .load(conn)?;
            assert_eq!(votes.len(), 2);
            assert!(votes.iter().all(|vote| vote.voice == Voice::Down));

            let result = cast(conn, thread, "nobody", Voice::Up);
            assert!(matches!(result, Err(ApiError::NotFound(ResourceType::User))));
            Ok(())
        });
    }
}
