//! Admin catalog lookup.
//!
//! ```text
//! GET  /catalog
//! POST /catalog  search=<show id>
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{ApiResult, Error, ShowId, ShowRecord};

use super::error::respond;
use super::page::render;
use super::session::SessionContext;
use super::state::HttpState;

/// Notice for an unusable search term.
pub const SEARCH_FAILED_MESSAGE: &str = "There was an error with your search. Please try again!";

/// Form body for `POST /catalog`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CatalogSearchForm {
    /// Catalog show id typed by the admin.
    pub search: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogView {
    authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    show: Option<ShowRecord>,
}

/// Render the empty lookup form for admins.
#[get("/catalog")]
pub async fn catalog_page(session: SessionContext) -> HttpResponse {
    let result = empty_catalog(&session);
    respond(&session, "/catalog", result)
}

fn empty_catalog(session: &SessionContext) -> ApiResult<HttpResponse> {
    let context = session.request_context()?;
    context.require_admin()?;
    Ok(render(
        session,
        CatalogView {
            authorized: context.authorization_code().is_some(),
            show: None,
        },
    ))
}

/// Look a show up by its catalog id.
#[post("/catalog")]
pub async fn catalog_search(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: Result<web::Form<CatalogSearchForm>, actix_web::Error>,
) -> HttpResponse {
    let result: ApiResult<HttpResponse> = async {
        let context = session.request_context()?;
        context.require_admin()?;
        let code = context.require_authorization_code()?;
        let submitted = form
            .map_err(|_| Error::invalid_request(SEARCH_FAILED_MESSAGE))?
            .into_inner();
        let show_id = ShowId::new(&submitted.search)
            .map_err(|_| Error::invalid_request(SEARCH_FAILED_MESSAGE))?;
        let show = state.catalog.lookup_show(code, &show_id).await?;
        Ok(render(
            &session,
            CatalogView {
                authorized: true,
                show: Some(show),
            },
        ))
    }
    .await;
    respond(&session, "/catalog", result)
}

#[cfg(test)]
mod tests {
    use super::SEARCH_FAILED_MESSAGE;
    use crate::inbound::http::test_utils::{
        TestWorld, get_page, grant_catalog_access, location, notice_messages, session_cookie,
        sign_in, test_app,
    };
    use crate::test_support::StubCatalogSource;
    use actix_web::test;

    fn catalog() -> StubCatalogSource {
        StubCatalogSource::default().with_show("abc123", "Cat Talk", &[])
    }

    #[actix_web::test]
    async fn non_admins_are_sent_home() {
        let world = TestWorld::new(catalog());
        world.seed_user("alice", false);
        let app = test::init_service(test_app(world.state.clone())).await;
        let cookie = sign_in(&app, "alice").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/catalog")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some("/"));
    }

    #[actix_web::test]
    async fn lookup_without_consent_restarts_authorization() {
        let world = TestWorld::new(catalog());
        world.seed_user("root", true);
        let app = test::init_service(test_app(world.state.clone())).await;
        let cookie = sign_in(&app, "root").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/catalog")
                .cookie(cookie)
                .set_form([("search", "abc123")])
                .to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some("/"));
        assert_eq!(world.tokens.calls(), 0);
    }

    #[actix_web::test]
    async fn admin_lookup_renders_the_show() {
        let world = TestWorld::new(catalog());
        world.seed_user("root", true);
        let app = test::init_service(test_app(world.state.clone())).await;
        let signed_in = sign_in(&app, "root").await;
        let cookie = grant_catalog_access(&app, signed_in).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/catalog")
                .cookie(cookie)
                .set_form([("search", "abc123")])
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
        let page: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(page["view"]["show"]["name"], "Cat Talk");
        assert_eq!(page["view"]["show"]["id"], "abc123");
        assert_eq!(world.tokens.calls(), 1);
    }

    #[actix_web::test]
    async fn unknown_show_returns_to_catalog_with_notice() {
        let world = TestWorld::new(catalog());
        world.seed_user("root", true);
        let app = test::init_service(test_app(world.state.clone())).await;
        let signed_in = sign_in(&app, "root").await;
        let cookie = grant_catalog_access(&app, signed_in).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/catalog")
                .cookie(cookie.clone())
                .set_form([("search", "missing1")])
                .to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some("/catalog"));
        let after_lookup = session_cookie(&res, Some(cookie)).expect("cookie");
        let page = get_page(&app, "/catalog", after_lookup).await;
        assert_eq!(notice_messages(&page), vec![SEARCH_FAILED_MESSAGE.to_owned()]);
    }
}
