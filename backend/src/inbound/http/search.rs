//! Episode keyword search for a stored podcast.
//!
//! ```text
//! POST /podcasts/{id}/search  keyword=cat&offset=50
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ApiResult, EPISODE_PAGE_SIZE, EpisodeOffset, Error, Keyword, Podcast, contains_podcast,
};

use super::error::{recover, respond};
use super::page::render_with;
use super::podcasts::load_podcast;
use super::session::{Notice, SessionContext};
use super::state::HttpState;

/// Form body for a keyword search.
#[derive(Debug, Deserialize, Serialize)]
pub struct KeywordForm {
    /// Term matched against episode names and descriptions.
    pub keyword: String,
    /// Episode page offset; blank means the first page.
    pub offset: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchView {
    podcast: Podcast,
    on_watchlist: bool,
    keyword: String,
    offset: EpisodeOffset,
    page_size: u32,
    episodes: Vec<String>,
}

/// Search one page of a podcast's episodes for a keyword.
///
/// An empty result renders with a "no episodes" notice; an offset past the
/// last episode redirects back to the podcast page.
#[post("/podcasts/{id}/search")]
pub async fn search_episodes(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: Result<web::Form<KeywordForm>, actix_web::Error>,
) -> HttpResponse {
    let located: ApiResult<_> = async {
        let context = session.request_context()?;
        let viewer = context.require_user()?;
        let code = context.require_authorization_code()?.clone();
        let podcast = load_podcast(&state, &path).await?;
        Ok((viewer, code, podcast))
    }
    .await;
    let (viewer, code, podcast) = match located {
        Ok(found) => found,
        Err(error) => return recover(&session, &error, "/podcasts"),
    };

    let origin = format!("/podcasts/{}", podcast.id());
    let result: ApiResult<HttpResponse> = async {
        let submitted = form
            .map_err(|_| Error::invalid_request("Please enter a keyword to search for!"))?
            .into_inner();
        let keyword = Keyword::new(submitted.keyword)
            .map_err(|_| Error::invalid_request("Please enter a keyword to search for!"))?;
        let offset = EpisodeOffset::parse(submitted.offset.as_deref())
            .map_err(|_| Error::invalid_request("The offset must be a whole number"))?;

        let matches = state
            .catalog
            .search_episodes(&code, podcast.show_id(), &keyword, offset)
            .await?;
        let entries = state.watchlist.list_for_user(&viewer.user_id).await?;

        let extra = matches.is_empty().then(|| {
            Notice::info(format!("No episodes were found using the word {keyword}!"))
        });
        Ok(render_with(
            &session,
            SearchView {
                on_watchlist: contains_podcast(&entries, podcast.id()),
                podcast,
                keyword: keyword.as_str().to_owned(),
                offset,
                page_size: EPISODE_PAGE_SIZE,
                episodes: matches.titles().to_vec(),
            },
            extra,
        ))
    }
    .await;
    respond(&session, &origin, result)
}
