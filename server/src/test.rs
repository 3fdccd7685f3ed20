use crate::api;
use crate::api::ApiResult;
use crate::app::AppState;
use crate::config::Config;
use crate::db::{self, Connection as PooledConnection};
use crate::model::forum::{Forum, NewForum};
use crate::model::thread::{NewThread, Thread};
use crate::model::user::{NewUser, User};
use crate::schema::{forum, thread, user};
use crate::time::DateTime;
use crate::update;
use axum::http::StatusCode;
use axum_test::TestServer;
use diesel::prelude::*;
use diesel::r2d2::PoolError;
use diesel::result::Error;
use std::sync::LazyLock;

/// Database used by tests, so that clearing it never touches real data.
pub const TEST_DATABASE: &str = "forum_test";

static STATE: LazyLock<AppState> = LazyLock::new(|| {
    let mut config = Config::from_toml(include_str!("../config.toml.dist")).unwrap_or_else(|err| panic!("{err}"));
    config.database.max_connections = 4;

    let database_url = db::create_url(Some(TEST_DATABASE)).unwrap_or_else(|err| panic!("{err}"));
    let connection_pool =
        db::create_connection_pool(&config.database, database_url).unwrap_or_else(|err| panic!("{err}"));
    let mut conn = connection_pool.get().unwrap_or_else(|err| panic!("{err}"));
    db::run_migrations(&mut conn).unwrap_or_else(|err| panic!("{err}"));
    AppState::new(connection_pool, config)
});

pub fn get_connection() -> Result<PooledConnection, PoolError> {
    STATE.get_connection()
}

/// Server for HTTP round trips against the test database.
pub fn test_server() -> TestServer {
    TestServer::new(api::routes(STATE.clone())).unwrap_or_else(|err| panic!("{err}"))
}

/// Removes all rows from the test database. Only call this from `#[serial]` tests.
pub fn reset_database() {
    let mut conn = get_connection().unwrap_or_else(|err| panic!("{err}"));
    update::clear_all(&mut conn).unwrap_or_else(|err| panic!("{err}"));
}

// Used in place of conn.test_transaction as that function doesn't give any useful information on failure
pub fn test_transaction<F, R>(function: F) -> R
where
    F: FnOnce(&mut PgConnection) -> ApiResult<R>,
{
    get_connection()
        .unwrap_or_else(|err| panic!("{err}"))
        .test_transaction::<_, Error, _>(|conn| Ok(function(conn).unwrap_or_else(|err| panic!("{err}"))))
}

pub fn create_test_user(conn: &mut PgConnection, nickname: &str) -> QueryResult<User> {
    let email = format!("{nickname}@test.org");
    let new_user = NewUser {
        nickname,
        fullname: "Test User",
        about: "",
        email: &email,
    };
    new_user
        .insert_into(user::table)
        .returning(User::as_returning())
        .get_result(conn)
}

/// Creates a forum whose slug is derived from its owner's nickname.
pub fn create_test_forum(conn: &mut PgConnection, owner: &User) -> QueryResult<Forum> {
    let slug = format!("{}-forum", owner.nickname);
    let new_forum = NewForum {
        title: "Test Forum",
        owner: &owner.nickname,
        slug: &slug,
    };
    new_forum
        .insert_into(forum::table)
        .returning(Forum::as_returning())
        .get_result(conn)
}

pub fn create_test_thread(conn: &mut PgConnection, forum: &Forum, author: &User) -> QueryResult<Thread> {
    let new_thread = NewThread {
        title: "Test Thread",
        author: &author.nickname,
        forum_slug: &forum.slug,
        message: "",
        slug: None,
        created: DateTime::now(),
    };
    new_thread
        .insert_into(thread::table)
        .returning(Thread::as_returning())
        .get_result(conn)
}

/// Creates a user, a forum and an empty thread in it.
pub fn create_test_discussion(conn: &mut PgConnection, nickname: &str) -> QueryResult<(User, Thread)> {
    let user = create_test_user(conn, nickname)?;
    let forum = create_test_forum(conn, &user)?;
    let thread = create_test_thread(conn, &forum, &user)?;
    Ok((user, thread))
}

pub async fn create_user_over_http(server: &TestServer, nickname: &str) {
    let body = serde_json::json!({
        "fullname": "Test User",
        "about": "",
        "email": format!("{nickname}@test.org"),
    });
    server
        .post(&format!("/api/user/{nickname}/create"))
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);
}
