//! HTTP adapter mapping for domain errors.
//!
//! Handler failures are recovered into a `303 See Other` redirect plus a
//! session notice. Failures that escape a handler (extractors, middleware)
//! are rendered as JSON through [`ResponseError`].

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::domain::{ApiResult, Error, ErrorCode, TRACE_ID_HEADER};

use super::session::{Notice, SessionContext};

/// Notice shown for failures whose details must not reach the user.
pub const GENERIC_FAILURE_MESSAGE: &str = "There was an error!";

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

/// `303 See Other` pointing at `location`.
#[must_use]
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// Where the browser goes after `error`.
///
/// Missing identity goes to the login page and missing permission to the
/// home page; everything else returns to `origin`.
const fn destination<'a>(error: &Error, origin: &'a str) -> &'a str {
    match error.code() {
        ErrorCode::Unauthorized => "/login",
        ErrorCode::Forbidden => "/",
        _ => origin,
    }
}

fn notice_for(error: &Error) -> Notice {
    let hidden = match error.code() {
        ErrorCode::InternalError => true,
        ErrorCode::ServiceUnavailable => error.detail_code().is_none(),
        _ => false,
    };
    if hidden {
        error!(
            code = ?error.code(),
            message = error.message(),
            trace_id = error.trace_id(),
            "request failed"
        );
        Notice::error(GENERIC_FAILURE_MESSAGE)
    } else {
        Notice::error(error.message())
    }
}

/// Turn a handler failure into a redirect with a notice.
#[must_use]
pub fn recover(session: &SessionContext, error: &Error, origin: &str) -> HttpResponse {
    if let Err(push_error) = session.push_notice(notice_for(error)) {
        warn!(error = %push_error, "failed to queue notice");
    }
    see_other(destination(error, origin))
}

/// Resolve a handler result, recovering failures into redirects.
#[must_use]
pub fn respond(
    session: &SessionContext,
    origin: &str,
    result: ApiResult<HttpResponse>,
) -> HttpResponse {
    result.unwrap_or_else(|error| recover(session, &error, origin))
}
