//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use url::Url;

use crate::domain::ports::{
    MockCatalogService, MockLoginService, MockPodcastRepository, MockRegistrationService,
    MockUserRepository, MockWatchListRepository,
};
use crate::domain::{AccountService, CatalogAccess, CatalogAccessSettings, User};
use crate::test_support::{InMemoryStore, MutableClock, StubCatalogSource, StubTokenExchange};

use super::state::HttpState;

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state wired to in-memory adapters.
pub struct TestWorld {
    /// Backing store for users, podcasts and watchlists.
    pub store: Arc<InMemoryStore>,
    /// Token exchange that counts its calls.
    pub tokens: Arc<StubTokenExchange>,
    /// State handed to the app.
    pub state: HttpState,
}

impl TestWorld {
    /// Wire the in-memory adapters around `catalog`.
    pub fn new(catalog: StubCatalogSource) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let tokens = Arc::new(StubTokenExchange::default());
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("valid start time"),
        ));
        let settings = CatalogAccessSettings {
            authorize_url: Url::parse("https://accounts.example.test/authorize")
                .expect("valid authorize url"),
            client_id: "client".to_owned(),
            redirect_uri: "http://127.0.0.1:5000/".to_owned(),
            token_cache_ttl: Duration::ZERO,
        };
        let catalog = CatalogAccess::new(tokens.clone(), Arc::new(catalog), clock, settings);
        let accounts = Arc::new(AccountService::new(store.clone()));
        let state = HttpState {
            login: accounts.clone(),
            registration: accounts,
            users: store.clone(),
            podcasts: store.clone(),
            watchlist: store.clone(),
            catalog: Arc::new(catalog),
        };
        Self {
            store,
            tokens,
            state,
        }
    }

    /// Seed a user whose password is `secret1`.
    pub fn seed_user(&self, username: &str, admin: bool) -> User {
        self.store
            .insert_account(InMemoryStore::account(username, "secret1", admin))
    }
}

/// State whose ports have no expectations, so any port call fails the test.
pub fn untouchable_state() -> HttpState {
    HttpState {
        login: Arc::new(MockLoginService::new()),
        registration: Arc::new(MockRegistrationService::new()),
        users: Arc::new(MockUserRepository::new()),
        podcasts: Arc::new(MockPodcastRepository::new()),
        watchlist: Arc::new(MockWatchListRepository::new()),
        catalog: Arc::new(MockCatalogService::new()),
    }
}

/// App with every podwatch route and a test session.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .configure(super::configure)
}

/// Latest session cookie, falling back to `previous` when none was set.
pub fn session_cookie(
    res: &ServiceResponse,
    previous: Option<Cookie<'static>>,
) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .or(previous)
}

/// `Location` header of a redirect.
pub fn location(res: &ServiceResponse) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Log in through `POST /login` and return the session cookie.
pub async fn sign_in(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/login")
            .set_form([("username", username), ("password", "secret1")])
            .to_request(),
    )
    .await;
    assert_eq!(location(&res).as_deref(), Some("/"));
    session_cookie(&res, None).expect("session cookie")
}

/// Visit `/` with a provider code so catalog calls are authorised.
pub async fn grant_catalog_access(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: Cookie<'static>,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri("/?code=granted")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    session_cookie(&res, Some(cookie)).expect("session cookie")
}

/// GET `uri` and decode the page JSON.
pub async fn get_page(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    uri: &str,
    cookie: Cookie<'static>,
) -> Value {
    let res = test::call_service(
        app,
        test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
    )
    .await;
    assert!(res.status().is_success(), "{uri} returned {}", res.status());
    test::read_body_json(res).await
}

/// Messages of the notices carried by a page.
pub fn notice_messages(page: &Value) -> Vec<String> {
    page.get("notices")
        .and_then(Value::as_array)
        .map(|notices| {
            notices
                .iter()
                .filter_map(|notice| notice.get("message").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
