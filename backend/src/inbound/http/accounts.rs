//! Registration, login and logout handlers.
//!
//! ```text
//! GET  /register
//! POST /register  username=alice&password=secret1&email=alice@example.com
//! GET  /login
//! POST /login     username=alice&password=secret1
//! GET  /logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::{
    ApiResult, Error, LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration,
    RegistrationValidationError,
};

use super::error::{GENERIC_FAILURE_MESSAGE, respond, see_other};
use super::page::render;
use super::session::{Notice, SessionContext};
use super::state::HttpState;

/// Notice shown after signing out.
pub const LOGGED_OUT_MESSAGE: &str = "You have logged out!";

/// Form body for `POST /register`.
#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterForm {
    /// Requested login name.
    pub username: String,
    /// Chosen password.
    pub password: String,
    /// Contact email.
    pub email: String,
}

/// Form body for `POST /login`.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginForm {
    /// Login name.
    pub username: String,
    /// Password as typed.
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormView {
    form: &'static str,
    fields: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    password_min_length: Option<usize>,
}

fn malformed_form() -> Error {
    Error::invalid_request(GENERIC_FAILURE_MESSAGE)
}

fn map_registration_error(err: &RegistrationValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": "invalid_registration" }))
}

fn map_login_validation_error(err: &LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Describe the registration form.
#[get("/register")]
pub async fn register_page(session: SessionContext) -> HttpResponse {
    render(
        &session,
        FormView {
            form: "register",
            fields: &["username", "password", "email"],
            password_min_length: Some(PASSWORD_MIN),
        },
    )
}

/// Create an account and sign it in.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: Result<web::Form<RegisterForm>, actix_web::Error>,
) -> HttpResponse {
    let result: ApiResult<HttpResponse> = async {
        let submitted = form.map_err(|_| malformed_form())?.into_inner();
        let registration = Registration::try_from_parts(
            &submitted.username,
            &submitted.password,
            &submitted.email,
        )
                .map_err(|err| map_registration_error(&err))?;
        let user = state.registration.register(&registration).await?;
        session.persist_user(&user)?;
        info!(user_id = %user.id(), "registered and signed in");
        Ok(see_other("/"))
    }
    .await;
    respond(&session, "/register", result)
}

/// Describe the login form.
#[get("/login")]
pub async fn login_page(session: SessionContext) -> HttpResponse {
    render(
        &session,
        FormView {
            form: "login",
            fields: &["username", "password"],
            password_min_length: None,
        },
    )
}

/// Authenticate and establish a session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: Result<web::Form<LoginForm>, actix_web::Error>,
) -> HttpResponse {
    let result: ApiResult<HttpResponse> = async {
        let submitted = form.map_err(|_| malformed_form())?.into_inner();
        let credentials = LoginCredentials::try_from_parts(&submitted.username, &submitted.password)
            .map_err(|err| map_login_validation_error(&err))?;
        let user = state.login.authenticate(&credentials).await?;
        session.persist_user(&user)?;
        Ok(see_other("/"))
    }
    .await;
    respond(&session, "/login", result)
}

/// Clear the session and drop any cached catalog token.
#[get("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    match session.request_context() {
        Ok(context) => {
            if let Some(code) = context.authorization_code() {
                state.catalog.forget(code).await;
            }
        }
        Err(error) => warn!(%error, "unreadable session during logout"),
    }
    session.clear();
    if let Err(error) = session.push_notice(Notice::info(LOGGED_OUT_MESSAGE)) {
        warn!(%error, "failed to queue logout notice");
    }
    see_other("/login")
}
