//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use serde_json::json;

use crate::domain::{Error, NewUserAccount, User, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The username is held by another account.
        DuplicateUsername { username: String } => "username {username} is already taken",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        match error {
            UserPersistenceError::DuplicateUsername { username } => {
                Error::conflict(format!("The username {username} is already taken!"))
                    .with_details(json!({ "code": "duplicate_username", "field": "username" }))
            }
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        }
    }
}

/// Port for storing and reading registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return the stored user.
    async fn create(&self, account: &NewUserAccount) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and password digest by exact username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;
}
