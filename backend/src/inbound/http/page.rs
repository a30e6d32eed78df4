//! JSON page views.
//!
//! Every page handler answers with the data a template would receive plus
//! the notices queued since the last page.

use actix_web::HttpResponse;
use serde::Serialize;

use super::session::{Notice, SessionContext};

/// Envelope for a rendered page.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// Notices queued since the previous page, oldest first.
    pub notices: Vec<Notice>,
    /// Page-specific data.
    pub view: T,
}

/// Render `view`, draining pending notices into the page.
pub fn render<T: Serialize>(session: &SessionContext, view: T) -> HttpResponse {
    HttpResponse::Ok().json(Page {
        notices: session.take_notices(),
        view,
    })
}

/// Render `view` with `extra` appended after the pending notices.
pub fn render_with<T: Serialize>(
    session: &SessionContext,
    view: T,
    extra: impl IntoIterator<Item = Notice>,
) -> HttpResponse {
    let mut notices = session.take_notices();
    notices.extend(extra);
    HttpResponse::Ok().json(Page { notices, view })
}
