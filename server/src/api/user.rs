use crate::api::doc::USER_TAG;
use crate::api::error::ApiResult;
use crate::api::extract::{Json, Path};
use crate::app::AppState;
use crate::model::user::{NewUser, UserChanges};
use crate::resource::user::UserInfo;
use crate::string::SmallString;
use crate::{query, update};
use crate::update::user::UserCreation;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use diesel::Connection;
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create))
        .routes(routes!(get, update))
}

/// Request body for creating a user.
#[derive(Deserialize, ToSchema)]
struct UserCreateBody {
    fullname: String,
    about: String,
    /// Must not be used by any other user. Compared case-insensitively.
    email: SmallString,
}

/// Creates a new user.
///
/// Nicknames and emails are case insensitive. If either is already taken, nothing is
/// created and every user that owns one of them is returned.
#[utoipa::path(
    post,
    path = "/user/{nickname}/create",
    tag = USER_TAG,
    params(("nickname" = String, Path, description = "Nickname of the new user")),
    request_body = UserCreateBody,
    responses(
        (status = 201, body = UserInfo),
        (status = 400, description = "Body is malformed"),
        (status = 409, description = "Nickname or email is taken", body = Vec<UserInfo>),
    ),
)]
async fn create(
    State(state): State<AppState>,
    Path(nickname): Path<SmallString>,
    Json(body): Json<UserCreateBody>,
) -> ApiResult<Response> {
    let new_user = NewUser {
        nickname: &nickname,
        fullname: &body.fullname,
        about: &body.about,
        email: &body.email,
    };

    let creation = state
        .get_connection()?
        .transaction(|conn| update::user::create(conn, &new_user))?;
    Ok(match creation {
        UserCreation::Created(user) => (StatusCode::CREATED, Json(UserInfo::from(user))).into_response(),
        UserCreation::Conflict(users) => {
            let users: Vec<UserInfo> = users.into_iter().map(UserInfo::from).collect();
            (StatusCode::CONFLICT, Json(users)).into_response()
        }
    })
}

/// Retrieves the profile of an existing user.
#[utoipa::path(
    get,
    path = "/user/{nickname}/profile",
    tag = USER_TAG,
    params(("nickname" = String, Path, description = "User nickname, case insensitive")),
    responses(
        (status = 200, body = UserInfo),
        (status = 404, description = "User does not exist"),
    ),
)]
async fn get(State(state): State<AppState>, Path(nickname): Path<SmallString>) -> ApiResult<Json<UserInfo>> {
    state.get_connection()?.transaction(|conn| {
        query::user(conn, &nickname).map(UserInfo::from).map(Json)
    })
}

/// Request body for updating a user's profile.
#[derive(Deserialize, ToSchema)]
struct UserUpdateBody {
    fullname: Option<String>,
    about: Option<String>,
    email: Option<SmallString>,
}

/// Updates the profile of an existing user.
///
/// Absent or blank fields are left unchanged.
#[utoipa::path(
    post,
    path = "/user/{nickname}/profile",
    tag = USER_TAG,
    params(("nickname" = String, Path, description = "User nickname, case insensitive")),
    request_body = UserUpdateBody,
    responses(
        (status = 200, body = UserInfo),
        (status = 400, description = "Body is malformed"),
        (status = 404, description = "User does not exist"),
        (status = 409, description = "Email is used by another user"),
    ),
)]
async fn update(
    State(state): State<AppState>,
    Path(nickname): Path<SmallString>,
    Json(body): Json<UserUpdateBody>,
) -> ApiResult<Json<UserInfo>> {
    let changes = UserChanges {
        fullname: non_blank(body.fullname.as_deref()),
        about: non_blank(body.about.as_deref()),
        email: non_blank(body.email.as_deref()),
    };

    state.get_connection()?.transaction(|conn| {
        update::user::update(conn, &nickname, &changes)
            .map(UserInfo::from)
            .map(Json)
    })
}

/// Treats blank text as if it were absent.
pub(super) fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::*;
    use serde_json::{Value, json};
    use serial_test::serial;

    #[test]
    fn blank_fields_are_absent() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some(" \t\n")), None);
        assert_eq!(non_blank(Some(" Jack ")), Some(" Jack "));
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a running PostgreSQL database"]
    async fn create_and_update() {
        let server = test_server();
        reset_database();

        let body = json!({"fullname": "Jack Sparrow", "about": "Captain", "email": "captain@blackpearl.sea"});
        let response = server.post("/api/user/J.Sparrow/create").json(&body).await;
        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({
            "nickname": "J.Sparrow",
            "fullname": "Jack Sparrow",
            "about": "Captain",
            "email": "captain@blackpearl.sea",
        }));

        let response = server.get("/api/user/j.sparrow/profile").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["nickname"], "J.Sparrow");

        let response = server
            .post("/api/user/J.SPARROW/profile")
            .json(&json!({"about": "Pirate", "fullname": "  "}))
            .await;
        response.assert_status_ok();
        let profile = response.json::<Value>();
        assert_eq!(profile["about"], "Pirate");
        assert_eq!(profile["fullname"], "Jack Sparrow");

        let response = server.get("/api/user/nobody/profile").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["name"], "UserNotFound");
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a running PostgreSQL database"]
    async fn conflicts_list_every_owner() {
        let server = test_server();
        reset_database();

        let first = json!({"fullname": "A", "about": "", "email": "a@mail.org"});
        let second = json!({"fullname": "B", "about": "", "email": "b@mail.org"});
        server.post("/api/user/alpha/create").json(&first).await.assert_status(StatusCode::CREATED);
        server.post("/api/user/beta/create").json(&second).await.assert_status(StatusCode::CREATED);

        let clash = json!({"fullname": "C", "about": "", "email": "B@MAIL.ORG"});
        let response = server.post("/api/user/ALPHA/create").json(&clash).await;
        response.assert_status(StatusCode::CONFLICT);
        let nicknames: Vec<Value> = response
            .json::<Vec<Value>>()
            .into_iter()
            .map(|user| user["nickname"].clone())
            .collect();
        assert_eq!(nicknames, [json!("alpha"), json!("beta")]);

        let response = server
            .post("/api/user/alpha/profile")
            .json(&json!({"email": "b@mail.org"}))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["name"], "UserAlreadyExists");
    }
}
