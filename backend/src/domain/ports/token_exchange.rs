//! Driven port for trading an authorization code for a bearer token.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{AuthorizationCode, BearerToken, Error};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the token endpoint adapter.
    pub enum TokenExchangeError {
        /// The provider answered without an access token.
        Rejected { message: String } => "token exchange rejected: {message}",
        /// Timeout or connection failure before a response arrived.
        Transient { message: String } => "token endpoint unreachable: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "token response decode failed: {message}",
    }
}

impl From<TokenExchangeError> for Error {
    fn from(error: TokenExchangeError) -> Self {
        match error {
            TokenExchangeError::Transient { .. } => {
                Error::service_unavailable("The catalog provider did not respond. Please try again!")
                    .with_details(json!({ "code": "transient_network" }))
            }
            TokenExchangeError::Rejected { .. } | TokenExchangeError::Decode { .. } => {
                Error::service_unavailable("There was an error!")
                    .with_details(json!({ "code": "token_exchange_failed" }))
            }
        }
    }
}

/// Port for the provider's token endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchange `code` for a bearer token. One attempt, no retries.
    async fn exchange(&self, code: &AuthorizationCode) -> Result<BearerToken, TokenExchangeError>;
}
