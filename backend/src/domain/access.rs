//! Request-scoped access checks.
//!
//! Handlers build a [`RequestContext`] from the session once per request and
//! ask it for the guarantees they need. The checks are pure: they never touch
//! persistence or the catalog.

use serde_json::json;

use super::catalog::AuthorizationCode;
use super::error::Error;
use super::user::UserId;

/// Notice shown when a signed-in identity is required.
pub const LOGIN_REQUIRED_MESSAGE: &str = "You must be logged in to view that page!";
/// Notice shown when an admin identity is required.
pub const ADMIN_REQUIRED_MESSAGE: &str = "You must be an admin to view that page!";
/// Detail code attached when the catalog has not been authorized yet.
pub const CATALOG_AUTHORIZATION_REQUIRED: &str = "catalog_authorization_required";

/// Identity and catalog authorization read from the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    user_id: Option<UserId>,
    admin: bool,
    authorization_code: Option<AuthorizationCode>,
}

/// Signed-in identity returned by [`RequestContext::require_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// Signed-in user.
    pub user_id: UserId,
    /// Whether the user may manage the library.
    pub admin: bool,
}

impl RequestContext {
    /// Assemble a context from session values.
    #[must_use]
    pub const fn new(
        user_id: Option<UserId>,
        admin: bool,
        authorization_code: Option<AuthorizationCode>,
    ) -> Self {
        Self {
            user_id,
            admin,
            authorization_code,
        }
    }

    /// Authorization code captured from the consent redirect, if any.
    #[must_use]
    pub const fn authorization_code(&self) -> Option<&AuthorizationCode> {
        self.authorization_code.as_ref()
    }

    /// Require a signed-in identity.
    ///
    /// # Errors
    /// [`ErrorCode::Unauthorized`](super::ErrorCode::Unauthorized) when the
    /// session carries no user.
    pub fn require_user(&self) -> Result<Viewer, Error> {
        let user_id = self
            .user_id
            .clone()
            .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED_MESSAGE))?;
        Ok(Viewer {
            user_id,
            admin: self.admin,
        })
    }

    /// Require a signed-in admin. The identity check runs first.
    ///
    /// # Errors
    /// `Unauthorized` without an identity, `Forbidden` for non-admins.
    pub fn require_admin(&self) -> Result<Viewer, Error> {
        let viewer = self.require_user()?;
        if !viewer.admin {
            return Err(Error::forbidden(ADMIN_REQUIRED_MESSAGE));
        }
        Ok(viewer)
    }

    /// Require a catalog authorization code captured earlier in the session.
    ///
    /// # Errors
    /// `Forbidden` with detail code [`CATALOG_AUTHORIZATION_REQUIRED`].
    pub fn require_authorization_code(&self) -> Result<&AuthorizationCode, Error> {
        self.authorization_code.as_ref().ok_or_else(|| {
            Error::forbidden("You must accept the request or the application cannot function")
                .with_details(json!({ "code": CATALOG_AUTHORIZATION_REQUIRED }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn context(signed_in: bool, admin: bool) -> RequestContext {
        RequestContext::new(signed_in.then(UserId::random), admin, None)
    }

    #[rstest]
    #[case(false, false, Some(ErrorCode::Unauthorized))]
    #[case(false, true, Some(ErrorCode::Unauthorized))]
    #[case(true, false, None)]
    #[case(true, true, None)]
    fn require_user_checks_identity(
        #[case] signed_in: bool,
        #[case] admin: bool,
        #[case] expected: Option<ErrorCode>,
    ) {
        let result = context(signed_in, admin).require_user();
        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[rstest]
    #[case(false, false, Some(ErrorCode::Unauthorized))]
    #[case(false, true, Some(ErrorCode::Unauthorized))]
    #[case(true, false, Some(ErrorCode::Forbidden))]
    #[case(true, true, None)]
    fn require_admin_checks_identity_first(
        #[case] signed_in: bool,
        #[case] admin: bool,
        #[case] expected: Option<ErrorCode>,
    ) {
        let result = context(signed_in, admin).require_admin();
        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[rstest]
    fn admin_failure_uses_admin_notice() {
        let err = context(true, false).require_admin().expect_err("not admin");
        assert_eq!(err.message(), ADMIN_REQUIRED_MESSAGE);
    }

    #[rstest]
    fn missing_code_is_flagged() {
        let err = context(true, true)
            .require_authorization_code()
            .expect_err("no code");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.detail_code(), Some(CATALOG_AUTHORIZATION_REQUIRED));
    }

    #[rstest]
    fn present_code_is_returned() {
        let code = AuthorizationCode::new("abc").expect("code");
        let ctx = RequestContext::new(Some(UserId::random()), false, Some(code.clone()));
        assert_eq!(ctx.require_authorization_code().expect("code"), &code);
    }
}
