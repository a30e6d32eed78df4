//! Stored podcast library.
//!
//! ```text
//! GET  /podcasts
//! POST /podcasts              title=..&host=..&description=..&image_url=..&show_id=..
//! GET  /podcasts/{id}
//! POST /podcasts/{id}/remove
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{
    ApiResult, Error, NewPodcast, Podcast, PodcastId, PodcastValidationError, contains_podcast,
};

use super::error::{GENERIC_FAILURE_MESSAGE, respond, see_other};
use super::page::render;
use super::session::{Notice, SessionContext};
use super::state::HttpState;

/// Form body for `POST /podcasts`, filled from a catalog lookup.
#[derive(Debug, Deserialize, Serialize)]
pub struct PodcastForm {
    /// Show title.
    pub title: String,
    /// Publisher shown as the host.
    pub host: String,
    /// Show description; may be blank.
    #[serde(default)]
    pub description: String,
    /// Cover art URL; blank means none.
    pub image_url: Option<String>,
    /// Catalog show id.
    pub show_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LibraryView {
    user_id: String,
    admin: bool,
    podcasts: Vec<Podcast>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PodcastView {
    podcast: Podcast,
    on_watchlist: bool,
    admin: bool,
}

/// Resolve a podcast path segment to a stored podcast.
///
/// Malformed and unknown ids both read as `not_found`.
pub(super) async fn load_podcast(state: &HttpState, raw_id: &str) -> ApiResult<Podcast> {
    let id = PodcastId::parse(raw_id).map_err(|_| Error::not_found("invalid id"))?;
    state
        .podcasts
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("invalid id"))
}

fn map_podcast_validation_error(err: &PodcastValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "code": "invalid_podcast" }))
}

/// Render the podcast library for any signed-in user.
#[get("/podcasts")]
pub async fn list_podcasts(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    let result: ApiResult<HttpResponse> = async {
        let viewer = session.request_context()?.require_user()?;
        let podcasts = state.podcasts.list_all().await?;
        Ok(render(
            &session,
            LibraryView {
                user_id: viewer.user_id.to_string(),
                admin: viewer.admin,
                podcasts,
            },
        ))
    }
    .await;
    respond(&session, "/", result)
}

/// Store a podcast picked from the catalog.
#[post("/podcasts")]
pub async fn add_podcast(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: Result<web::Form<PodcastForm>, actix_web::Error>,
) -> HttpResponse {
    let result: ApiResult<HttpResponse> = async {
        session.request_context()?.require_admin()?;
        let fields = form
            .map_err(|_| Error::invalid_request(GENERIC_FAILURE_MESSAGE))?
            .into_inner();
        let podcast = NewPodcast::try_from_parts(
            &fields.title,
            &fields.host,
            &fields.description,
            fields.image_url.as_deref(),
            &fields.show_id,
        )
        .map_err(|err| map_podcast_validation_error(&err))?;
        let stored = state.podcasts.add(&podcast).await?;
        info!(podcast_id = %stored.id(), show_id = %stored.show_id(), "podcast added");
        session.push_notice(Notice::success(format!(
            "{} was added to the database!",
            stored.title()
        )))?;
        Ok(see_other("/catalog"))
    }
    .await;
    respond(&session, "/catalog", result)
}

/// Render one podcast and whether it is on the viewer's watchlist.
#[get("/podcasts/{id}")]
pub async fn show_podcast(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> HttpResponse {
    let result: ApiResult<HttpResponse> = async {
        let viewer = session.request_context()?.require_user()?;
        let podcast = load_podcast(&state, &path).await?;
        let entries = state.watchlist.list_for_user(&viewer.user_id).await?;
        Ok(render(
            &session,
            PodcastView {
                on_watchlist: contains_podcast(&entries, podcast.id()),
                podcast,
                admin: viewer.admin,
            },
        ))
    }
    .await;
    respond(&session, "/podcasts", result)
}

/// Delete a podcast together with every watchlist entry for it.
#[post("/podcasts/{id}/remove")]
pub async fn remove_podcast(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> HttpResponse {
    let result: ApiResult<HttpResponse> = async {
        session.request_context()?.require_admin()?;
        let id = PodcastId::parse(&path).map_err(|_| Error::not_found("invalid id"))?;
        if !state.podcasts.delete(id).await? {
            return Err(Error::not_found("invalid id"));
        }
        info!(podcast_id = %id, "podcast removed");
        session.push_notice(Notice::success("The podcast was removed."))?;
        Ok(see_other("/podcasts"))
    }
    .await;
    respond(&session, "/podcasts", result)
}

#[cfg(test)]
mod tests {
    use crate::inbound::http::test_utils::{
        TestWorld, get_page, location, notice_messages, session_cookie, sign_in, test_app,
    };
    use crate::test_support::StubCatalogSource;
    use actix_web::test;
    use rstest::rstest;

    fn podcast_form(show_id: &str) -> [(&'static str, String); 5] {
        [
            ("title", "Cat Talk".to_owned()),
            ("host", "Jo".to_owned()),
            ("description", "All about cats".to_owned()),
            ("image_url", String::new()),
            ("show_id", show_id.to_owned()),
        ]
    }

    #[actix_web::test]
    async fn admin_adds_podcast_and_sees_notice() {
        let world = TestWorld::new(StubCatalogSource::default());
        world.seed_user("root", true);
        let app = test::init_service(test_app(world.state.clone())).await;
        let cookie = sign_in(&app, "root").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/podcasts")
                .cookie(cookie.clone())
                .set_form(podcast_form("abc123"))
                .to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some("/catalog"));
        let after_add = session_cookie(&res, Some(cookie)).expect("cookie");

        let page = get_page(&app, "/catalog", after_add.clone()).await;
        assert_eq!(
            notice_messages(&page),
            vec!["Cat Talk was added to the database!".to_owned()]
        );
        let library = get_page(&app, "/podcasts", after_add).await;
        assert_eq!(library["view"]["podcasts"][0]["showId"], "abc123");
        assert_eq!(library["view"]["podcasts"][0]["imageUrl"], serde_json::Value::Null);
    }

    #[actix_web::test]
    async fn duplicate_show_is_reported_without_a_second_row() {
        let world = TestWorld::new(StubCatalogSource::default());
        world.seed_user("root", true);
        world.store.insert_podcast("Cat Talk", "abc123");
        let app = test::init_service(test_app(world.state.clone())).await;
        let cookie = sign_in(&app, "root").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/podcasts")
                .cookie(cookie)
                .set_form(podcast_form("abc123"))
                .to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some("/catalog"));
        assert_eq!(world.store.podcast_count(), 1);
    }

    #[rstest]
    #[case("/podcasts/999")]
    #[case("/podcasts/not-a-number")]
    #[actix_web::test]
    async fn unknown_podcasts_redirect_to_library(#[case] uri: &str) {
        let world = TestWorld::new(StubCatalogSource::default());
        world.seed_user("alice", false);
        let app = test::init_service(test_app(world.state.clone())).await;
        let cookie = sign_in(&app, "alice").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some("/podcasts"));
    }

    #[actix_web::test]
    async fn removal_requires_admin_and_cascades() {
        let world = TestWorld::new(StubCatalogSource::default());
        world.seed_user("alice", false);
        world.seed_user("root", true);
        let podcast = world.store.insert_podcast("Cat Talk", "abc123");
        let app = test::init_service(test_app(world.state.clone())).await;
        let uri = format!("/podcasts/{}/remove", podcast.id());

        let alice = sign_in(&app, "alice").await;
        let watched = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/watchlist/{}", podcast.id()))
                .cookie(alice.clone())
                .to_request(),
        )
        .await;
        assert_eq!(world.store.entry_count(), 1, "{:?}", location(&watched));

        let refused = test::call_service(
            &app,
            test::TestRequest::post().uri(&uri).cookie(alice).to_request(),
        )
        .await;
        assert_eq!(location(&refused).as_deref(), Some("/"));
        assert_eq!(world.store.podcast_count(), 1);

        let root = sign_in(&app, "root").await;
        let removed = test::call_service(
            &app,
            test::TestRequest::post().uri(&uri).cookie(root).to_request(),
        )
        .await;
        assert_eq!(location(&removed).as_deref(), Some("/podcasts"));
        assert_eq!(world.store.podcast_count(), 0);
        assert_eq!(world.store.entry_count(), 0);
    }
}
