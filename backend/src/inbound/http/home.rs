//! Home page and provider authorization callback.
//!
//! ```text
//! GET /                 -> redirect to the provider consent page
//! GET /?code=<code>     -> store the code, render home
//! GET /?error=<reason>  -> consent refused, back to /login
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{ApiResult, AuthorizationCode, Error};

use super::error::{respond, see_other};
use super::page::render;
use super::session::{Notice, SessionContext};
use super::state::HttpState;

/// Notice shown when the provider consent was refused.
pub const CONSENT_REFUSED_MESSAGE: &str =
    "You must accept the request or the application cannot function";

/// Query parameters the provider appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code granted by the provider.
    pub code: Option<String>,
    /// Reason the provider refused consent.
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HomeView {
    user_id: String,
    username: String,
    admin: bool,
}

/// Home page; doubles as the provider's redirect target.
#[get("/")]
pub async fn home(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CallbackQuery>,
) -> HttpResponse {
    let result = home_inner(&state, &session, query.into_inner()).await;
    respond(&session, "/login", result)
}

async fn home_inner(
    state: &HttpState,
    session: &SessionContext,
    query: CallbackQuery,
) -> ApiResult<HttpResponse> {
    let viewer = session.request_context()?.require_user()?;

    if let Some(reason) = query.error {
        info!(user_id = %viewer.user_id, %reason, "catalog consent refused");
        session.push_notice(Notice::error(CONSENT_REFUSED_MESSAGE))?;
        return Ok(see_other("/login"));
    }

    let Some(raw_code) = query.code else {
        return Ok(see_other(&state.catalog.authorization_url()));
    };
    let code = AuthorizationCode::new(raw_code)
        .map_err(|_| Error::invalid_request(CONSENT_REFUSED_MESSAGE))?;
    session.store_authorization_code(&code)?;

    let Some(user) = state.users.find_by_id(&viewer.user_id).await? else {
        warn!(user_id = %viewer.user_id, "session refers to an unknown user");
        session.clear();
        return Ok(see_other("/register"));
    };

    Ok(render(
        session,
        HomeView {
            user_id: user.id().to_string(),
            username: user.username().to_string(),
            admin: user.is_admin(),
        },
    ))
}
