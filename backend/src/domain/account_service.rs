//! Registration and login backed by the user repository.
//!
//! Password hashing and verification are CPU-bound, so both run on Tokio's
//! blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    INVALID_CREDENTIALS_MESSAGE, LoginService, RegistrationService, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, NewUserAccount, PasswordDigest, PlainPassword, Registration, User,
};

/// Account use-cases over a [`UserRepository`].
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    /// Wrap the repository holding user accounts.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

async fn hash_password(password: PlainPassword) -> Result<PasswordDigest, Error> {
    tokio::task::spawn_blocking(move || PasswordDigest::hash(&password))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))
}

async fn verify_password(digest: PasswordDigest, password: PlainPassword) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || digest.verify(&password))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(account) = self.users.find_by_username(credentials.username()).await? else {
            debug!(username = credentials.username(), "login for unknown username");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        if !verify_password(account.password_digest, credentials.password().clone()).await? {
            debug!(user_id = %account.user.id(), "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        Ok(account.user)
    }
}

#[async_trait]
impl RegistrationService for AccountService {
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let username = registration.username();
        if self
            .users
            .find_by_username(username.as_ref())
            .await?
            .is_some()
        {
            return Err(UserPersistenceError::duplicate_username(username.as_ref()).into());
        }

        let password_digest = hash_password(registration.password().clone()).await?;
        let user = self
            .users
            .create(&NewUserAccount {
                username: username.clone(),
                email: registration.email().clone(),
                password_digest,
            })
            .await?;

        info!(user_id = %user.id(), "registered user");
        Ok(user)
    }
}
