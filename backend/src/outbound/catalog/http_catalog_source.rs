//! Reqwest-backed catalog API adapter.
//!
//! This adapter owns transport details only: URL construction, bearer
//! authentication, timeout handling and classification of provider bodies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::warn;

use super::dto::{ShowDto, episode_items, is_error_envelope};
use super::transport::{body_preview, describe_transport_error, is_upstream_failure};
use crate::domain::ports::{CatalogSource, CatalogSourceError};
use crate::domain::{BearerToken, EPISODE_PAGE_SIZE, EpisodeOffset, EpisodeSummary, ShowId, ShowRecord};

/// Errors raised while constructing [`HttpCatalogSource`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogClientBuildError {
    /// reqwest refused the client configuration.
    #[error(transparent)]
    Client(#[from] reqwest::Error),
    /// The base URL cannot take path segments.
    #[error("catalog API base URL cannot carry path segments: {0}")]
    InvalidBase(Url),
}

/// Catalog adapter issuing GET requests below one API base URL.
pub struct HttpCatalogSource {
    client: Client,
    api_base: Url,
}

impl HttpCatalogSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Fails when the client cannot be built or `api_base` cannot take path
    /// segments (for example a `data:` URL).
    pub fn new(api_base: Url, timeout: Duration) -> Result<Self, CatalogClientBuildError> {
        if api_base.cannot_be_a_base() {
            return Err(CatalogClientBuildError::InvalidBase(api_base));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_base })
    }

    fn show_url(&self, show_id: &ShowId, tail: Option<&str>) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("shows").push(show_id.as_ref());
            if let Some(segment) = tail {
                segments.push(segment);
            }
        }
        url
    }

    async fn get_json(
        &self,
        url: Url,
        token: &BearerToken,
        query: &[(&str, u32)],
    ) -> Result<(StatusCode, Value), CatalogSourceError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose())
            .query(query)
            .send()
            .await
            .map_err(|error| CatalogSourceError::transient(describe_transport_error(&error)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| CatalogSourceError::transient(describe_transport_error(&error)))?;

        match serde_json::from_slice(&body) {
            Ok(value) => Ok((status, value)),
            Err(_) if !status.is_success() => {
                Err(CatalogSourceError::upstream(status.as_u16(), body_preview(&body)))
            }
            Err(error) => Err(CatalogSourceError::decode(format!(
                "invalid catalog JSON: {error}"
            ))),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn lookup_show(
        &self,
        token: &BearerToken,
        show_id: &ShowId,
    ) -> Result<ShowRecord, CatalogSourceError> {
        let (status, body) = self.get_json(self.show_url(show_id, None), token, &[]).await?;
        if is_error_envelope(&body) {
            warn!(show_id = %show_id, status = status.as_u16(), "catalog reported show error");
            return Err(CatalogSourceError::not_found(show_id.as_ref()));
        }
        let dto: ShowDto = serde_json::from_value(body)
            .map_err(|error| CatalogSourceError::decode(format!("invalid show payload: {error}")))?;
        dto.into_record().map_err(CatalogSourceError::decode)
    }

    async fn list_episodes(
        &self,
        token: &BearerToken,
        show_id: &ShowId,
        offset: EpisodeOffset,
    ) -> Result<Vec<EpisodeSummary>, CatalogSourceError> {
        let url = self.show_url(show_id, Some("episodes"));
        let query = [("limit", EPISODE_PAGE_SIZE), ("offset", offset.get())];
        let (status, body) = self.get_json(url, token, &query).await?;
        let preview = || body_preview(body.to_string().as_bytes());

        match episode_items(&body).map_err(CatalogSourceError::decode)? {
            Some(items) => Ok(items),
            None if is_upstream_failure(status) => {
                warn!(show_id = %show_id, status = status.as_u16(), "catalog episode listing failed");
                Err(CatalogSourceError::upstream(status.as_u16(), preview()))
            }
            None => Err(CatalogSourceError::offset_out_of_range(offset.get())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://api.example.com/v1", "https://api.example.com/v1/shows/abc/episodes")]
    #[case("https://api.example.com/v1/", "https://api.example.com/v1/shows/abc/episodes")]
    fn builds_episode_urls_below_base(#[case] base: &str, #[case] expected: &str) {
        let source = HttpCatalogSource::new(Url::parse(base).expect("url"), Duration::from_secs(1))
            .expect("client");
        let url = source.show_url(&ShowId::new("abc").expect("id"), Some("episodes"));
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn rejects_opaque_base_urls() {
        let result = HttpCatalogSource::new(
            Url::parse("mailto:ops@example.com").expect("url"),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(CatalogClientBuildError::InvalidBase(_))));
    }
}
