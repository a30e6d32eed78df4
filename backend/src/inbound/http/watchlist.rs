//! Per-user watchlist.
//!
//! ```text
//! POST /watchlist/{podcast_id}
//! GET  /watchlist/{user_id}
//! POST /watchlist/{podcast_id}/remove
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{
    ApiResult, Error, Podcast, PodcastId, UserId, WatchListEntry, podcasts_in_entry_order,
};

use super::error::{recover, respond, see_other};
use super::page::render;
use super::podcasts::load_podcast;
use super::session::{Notice, SessionContext};
use super::state::HttpState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WatchListView {
    user_id: String,
    podcasts: Vec<Podcast>,
}

/// Put a stored podcast on the viewer's watchlist.
///
/// An unknown podcast returns to the library; every other failure returns
/// to the podcast page.
#[post("/watchlist/{podcast_id}")]
pub async fn add_to_watchlist(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> HttpResponse {
    let located: ApiResult<_> = async {
        let viewer = session.request_context()?.require_user()?;
        let podcast = load_podcast(&state, &path).await?;
        Ok((viewer, podcast))
    }
    .await;
    let (viewer, podcast) = match located {
        Ok(found) => found,
        Err(error) => return recover(&session, &error, "/podcasts"),
    };

    let origin = format!("/podcasts/{}", podcast.id());
    let result: ApiResult<HttpResponse> = async {
        state
            .watchlist
            .add(&WatchListEntry::new(viewer.user_id.clone(), podcast.id()))
            .await?;
        info!(user_id = %viewer.user_id, podcast_id = %podcast.id(), "watchlist entry added");
        session.push_notice(Notice::success(format!(
            "{} was added to your watchlist!",
            podcast.title()
        )))?;
        Ok(see_other(&origin))
    }
    .await;
    respond(&session, &origin, result)
}

/// Render the signed-in user's watchlist.
///
/// A path naming anyone else redirects to the viewer's own list.
#[get("/watchlist/{user_id}")]
pub async fn show_watchlist(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> HttpResponse {
    let result: ApiResult<HttpResponse> = async {
        let viewer = session.request_context()?.require_user()?;
        let requested = UserId::new(path.as_str()).ok();
        if requested.as_ref() != Some(&viewer.user_id) {
            debug!(user_id = %viewer.user_id, "redirecting to own watchlist");
            return Ok(see_other(&format!("/watchlist/{}", viewer.user_id)));
        }

        let entries = state.watchlist.list_for_user(&viewer.user_id).await?;
        let ids: Vec<PodcastId> = entries.iter().map(|entry| entry.podcast_id).collect();
        let podcasts = state.podcasts.find_by_ids(&ids).await?;
        Ok(render(
            &session,
            WatchListView {
                user_id: viewer.user_id.to_string(),
                podcasts: podcasts_in_entry_order(&entries, podcasts),
            },
        ))
    }
    .await;
    respond(&session, "/podcasts", result)
}

/// Drop a podcast from the watchlist; absent entries are ignored.
#[post("/watchlist/{podcast_id}/remove")]
pub async fn remove_from_watchlist(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> HttpResponse {
    let result: ApiResult<HttpResponse> = async {
        let viewer = session.request_context()?.require_user()?;
        let podcast_id =
            PodcastId::parse(path.as_str()).map_err(|_| Error::not_found("invalid id"))?;
        state
            .watchlist
            .remove(&WatchListEntry::new(viewer.user_id.clone(), podcast_id))
            .await?;
        session.push_notice(Notice::success("The podcast was removed from your watchlist."))?;
        Ok(see_other("/podcasts"))
    }
    .await;
    respond(&session, "/podcasts", result)
}
