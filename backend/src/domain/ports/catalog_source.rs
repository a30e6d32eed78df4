//! Driven port for authenticated catalog reads.
//!
//! The domain owns the record shapes; adapters map provider JSON into them and
//! classify failures into the variants below.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{BearerToken, EpisodeOffset, EpisodeSummary, Error, ShowId, ShowRecord};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the catalog API.
    pub enum CatalogSourceError {
        /// The provider reported no show for the id.
        NotFound { show_id: String } => "show {show_id} was not found",
        /// The episode page had no `items`, meaning the offset is past the end.
        OffsetOutOfRange { offset: u32 } => "offset {offset} is past the last episode",
        /// Timeout or connection failure before a response arrived.
        Transient { message: String } => "catalog unreachable: {message}",
        /// The provider answered with an error status.
        Upstream { status: u16, message: String } => "catalog returned {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "catalog response decode failed: {message}",
    }
}

impl From<CatalogSourceError> for Error {
    fn from(error: CatalogSourceError) -> Self {
        match error {
            CatalogSourceError::NotFound { show_id } => {
                Error::not_found("There was an error with your search. Please try again!")
                    .with_details(json!({ "code": "show_not_found", "showId": show_id }))
            }
            CatalogSourceError::OffsetOutOfRange { offset } => {
                Error::invalid_request("The offset was too high")
                    .with_details(json!({ "code": "offset_out_of_range", "offset": offset }))
            }
            CatalogSourceError::Transient { .. } => {
                Error::service_unavailable("The catalog provider did not respond. Please try again!")
                    .with_details(json!({ "code": "transient_network" }))
            }
            CatalogSourceError::Upstream { status, .. } => Error::service_unavailable(
                "There was an error!",
            )
            .with_details(json!({ "code": "catalog_upstream", "status": status })),
            CatalogSourceError::Decode { .. } => Error::service_unavailable("There was an error!")
                .with_details(json!({ "code": "catalog_upstream" })),
        }
    }
}

/// Port for the catalog API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch show details.
    async fn lookup_show(
        &self,
        token: &BearerToken,
        show_id: &ShowId,
    ) -> Result<ShowRecord, CatalogSourceError>;

    /// Fetch one page of episodes starting at `offset`.
    async fn list_episodes(
        &self,
        token: &BearerToken,
        show_id: &ShowId,
        offset: EpisodeOffset,
    ) -> Result<Vec<EpisodeSummary>, CatalogSourceError>;
}
