//! Port abstraction for the stored podcast library.
use async_trait::async_trait;
use serde_json::json;

use crate::domain::{Error, NewPodcast, Podcast, PodcastId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by podcast repository adapters.
    pub enum PodcastPersistenceError {
        /// A podcast with the same catalog show id already exists.
        DuplicateShow { show_id: String } => "podcast for show {show_id} already exists",
        /// Repository connection could not be established.
        Connection { message: String } => "podcast repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "podcast repository query failed: {message}",
    }
}

impl From<PodcastPersistenceError> for Error {
    fn from(error: PodcastPersistenceError) -> Self {
        match error {
            PodcastPersistenceError::DuplicateShow { show_id } => {
                Error::conflict("That podcast is already in the database!")
                    .with_details(json!({ "code": "duplicate_show", "showId": show_id }))
            }
            PodcastPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("podcast repository unavailable: {message}"))
            }
            PodcastPersistenceError::Query { message } => {
                Error::internal(format!("podcast repository error: {message}"))
            }
        }
    }
}

/// Port for the podcast library.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PodcastRepository: Send + Sync {
    /// Store a podcast and return it with its assigned id.
    async fn add(&self, podcast: &NewPodcast) -> Result<Podcast, PodcastPersistenceError>;

    /// Fetch a single podcast by id, or `None` when it does not exist.
    async fn find_by_id(&self, id: PodcastId) -> Result<Option<Podcast>, PodcastPersistenceError>;

    /// Fetch several podcasts; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[PodcastId]) -> Result<Vec<Podcast>, PodcastPersistenceError>;

    /// All stored podcasts ordered by id.
    async fn list_all(&self) -> Result<Vec<Podcast>, PodcastPersistenceError>;

    /// Delete a podcast and every watchlist entry referencing it.
    ///
    /// Returns `false` when no podcast had that id.
    async fn delete(&self, id: PodcastId) -> Result<bool, PodcastPersistenceError>;
}
