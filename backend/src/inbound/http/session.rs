//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers deal in domain values: the
//! signed-in identity, the catalog authorization code and pending notices.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{AuthorizationCode, Error, RequestContext, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ADMIN_KEY: &str = "admin";
pub(crate) const CATALOG_CODE_KEY: &str = "catalog_code";
pub(crate) const NOTICES_KEY: &str = "notices";

/// Severity of a pending notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// A change went through.
    Success,
    /// Neutral information, such as an empty search.
    Info,
    /// The request failed.
    Error,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Notice at [`NoticeLevel::Success`].
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Notice at [`NoticeLevel::Info`].
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Notice at [`NoticeLevel::Error`].
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

fn read_failed(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

fn write_failed(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to persist session: {error}"))
}

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in user's id and admin flag.
    ///
    /// # Errors
    /// `internal` when the session cannot be written.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user.id().as_ref())
            .map_err(write_failed)?;
        self.0
            .insert(ADMIN_KEY, user.is_admin())
            .map_err(write_failed)
    }

    /// Store the catalog authorization code granted by the provider.
    ///
    /// # Errors
    /// `internal` when the session cannot be written.
    pub fn store_authorization_code(&self, code: &AuthorizationCode) -> Result<(), Error> {
        self.0
            .insert(CATALOG_CODE_KEY, code.expose())
            .map_err(write_failed)
    }

    /// Build the request-scoped access context.
    ///
    /// Tampered or malformed values are dropped with a warning, so a bad
    /// cookie reads as an anonymous session.
    ///
    /// # Errors
    /// `internal` when the session cannot be decoded at all.
    pub fn request_context(&self) -> Result<RequestContext, Error> {
        let user_id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(read_failed)?
            .and_then(|raw| {
                UserId::new(raw)
                    .inspect_err(|error| warn!(%error, "invalid user id in session cookie"))
                    .ok()
            });
        let admin = self
            .0
            .get::<bool>(ADMIN_KEY)
            .map_err(read_failed)?
            .unwrap_or(false);
        let authorization_code = self
            .0
            .get::<String>(CATALOG_CODE_KEY)
            .map_err(read_failed)?
            .and_then(|raw| AuthorizationCode::new(raw).ok());
        Ok(RequestContext::new(user_id, admin, authorization_code))
    }

    /// Queue a notice for the next rendered page.
    ///
    /// # Errors
    /// `internal` when the session cannot be read or written.
    pub fn push_notice(&self, notice: Notice) -> Result<(), Error> {
        let mut notices = self
            .0
            .get::<Vec<Notice>>(NOTICES_KEY)
            .map_err(read_failed)?
            .unwrap_or_default();
        notices.push(notice);
        self.0.insert(NOTICES_KEY, notices).map_err(write_failed)
    }

    /// Drain pending notices.
    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        self.0
            .remove_as::<Vec<Notice>>(NOTICES_KEY)
            .and_then(Result::ok)
            .unwrap_or_default()
    }

    /// Drop every session value.
    pub fn clear(&self) {
        self.0.clear();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Self::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use crate::domain::{EmailAddress, Username};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    fn admin_user() -> User {
        User::new(
            UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
            Username::new("alice").expect("fixture username"),
            EmailAddress::new("alice@example.com").expect("fixture email"),
            true,
        )
    }

    #[actix_web::test]
    async fn round_trips_identity_and_code() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(&admin_user())?;
                        session.store_authorization_code(
                            &AuthorizationCode::new("code-1").expect("fixture code"),
                        )?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let context = session.request_context()?;
                        let viewer = context.require_admin()?;
                        let code = context.require_authorization_code()?.expose().to_owned();
                        Ok::<_, Error>(HttpResponse::Ok().body(format!("{}:{code}", viewer.user_id)))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6:code-1");
    }

    #[actix_web::test]
    async fn tampered_user_id_reads_as_anonymous() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid user id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        session.request_context()?.require_user()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/require").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn notices_are_drained_once() {
        let app = test::init_service(session_test_app().route(
            "/notices",
            web::get().to(|session: SessionContext| async move {
                session.push_notice(Notice::info("first"))?;
                session.push_notice(Notice::error("second"))?;
                let drained = session.take_notices();
                let again = session.take_notices();
                Ok::<_, Error>(HttpResponse::Ok().body(format!("{}:{}", drained.len(), again.len())))
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/notices").to_request()).await;
        assert_eq!(test::read_body(res).await, "2:0");
    }
}
