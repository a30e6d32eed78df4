//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing infrastructure, so handler tests can substitute a test double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Notice shown for both unknown usernames and wrong passwords.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect username or password";

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
