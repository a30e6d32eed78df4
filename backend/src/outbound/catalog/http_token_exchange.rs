//! Reqwest-backed token endpoint adapter.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::dto::TokenResponseDto;
use super::transport::{body_preview, describe_transport_error};
use crate::domain::ports::{TokenExchange, TokenExchangeError};
use crate::domain::{AuthorizationCode, BearerToken};

/// Registered application credentials sent to the token endpoint.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Registered client id.
    pub client_id: String,
    /// Registered client secret.
    pub client_secret: Zeroizing<String>,
    /// Redirect URI echoed back to the token endpoint.
    pub redirect_uri: String,
}

impl ClientCredentials {
    fn basic_authorization(&self) -> Zeroizing<String> {
        let pair = Zeroizing::new(format!("{}:{}", self.client_id, self.client_secret.as_str()));
        Zeroizing::new(format!("Basic {}", STANDARD.encode(pair.as_bytes())))
    }
}

/// Token exchange adapter posting to one endpoint.
pub struct HttpTokenExchange {
    client: Client,
    endpoint: Url,
    credentials: ClientCredentials,
}

impl HttpTokenExchange {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        credentials: ClientCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn exchange(&self, code: &AuthorizationCode) -> Result<BearerToken, TokenExchangeError> {
        let authorization = self.credentials.basic_authorization();
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, authorization.as_str())
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", "client_credentials"),
                ("code", code.expose()),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|error| TokenExchangeError::transient(describe_transport_error(&error)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| TokenExchangeError::transient(describe_transport_error(&error)))?;

        let decoded: TokenResponseDto = serde_json::from_slice(&body).map_err(|error| {
            TokenExchangeError::decode(format!(
                "status {}: {error}; body: {}",
                status.as_u16(),
                body_preview(&body)
            ))
        })?;

        match decoded.access_token {
            Some(token) if !token.is_empty() => {
                debug!(code = %code.fingerprint(), "token endpoint issued access token");
                Ok(BearerToken::new(token))
            }
            _ => {
                let reason = decoded.rejection_reason();
                warn!(
                    code = %code.fingerprint(),
                    status = status.as_u16(),
                    reason = %reason,
                    "token endpoint rejected authorization code"
                );
                Err(TokenExchangeError::rejected(reason))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_authorization_encodes_client_pair() {
        let credentials = ClientCredentials {
            client_id: "id".into(),
            client_secret: Zeroizing::new("secret".into()),
            redirect_uri: "http://127.0.0.1:5000/".into(),
        };
        assert_eq!(credentials.basic_authorization().as_str(), "Basic aWQ6c2VjcmV0");
    }
}
