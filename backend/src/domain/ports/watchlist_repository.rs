//! Port abstraction for per-user watchlists.
use async_trait::async_trait;
use serde_json::json;

use crate::domain::{Error, UserId, WatchListEntry};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by watchlist repository adapters.
    pub enum WatchListPersistenceError {
        /// The pair is already on the watchlist.
        Duplicate { podcast_id: i32 } => "podcast {podcast_id} is already on the watchlist",
        /// The referenced podcast does not exist.
        PodcastNotFound { podcast_id: i32 } => "podcast {podcast_id} does not exist",
        /// Repository connection could not be established.
        Connection { message: String } => "watchlist repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "watchlist repository query failed: {message}",
    }
}

impl From<WatchListPersistenceError> for Error {
    fn from(error: WatchListPersistenceError) -> Self {
        match error {
            WatchListPersistenceError::Duplicate { podcast_id } => {
                Error::conflict("That podcast is already on your watchlist!")
                    .with_details(json!({ "code": "duplicate_watchlist_entry", "podcastId": podcast_id }))
            }
            WatchListPersistenceError::PodcastNotFound { .. } => Error::not_found("invalid id"),
            WatchListPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("watchlist repository unavailable: {message}"))
            }
            WatchListPersistenceError::Query { message } => {
                Error::internal(format!("watchlist repository error: {message}"))
            }
        }
    }
}

/// Port for watchlist membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchListRepository: Send + Sync {
    /// Add a pair; a second add of the same pair fails with `Duplicate`.
    async fn add(&self, entry: &WatchListEntry) -> Result<(), WatchListPersistenceError>;

    /// Remove a pair; absent pairs are a no-op.
    async fn remove(&self, entry: &WatchListEntry) -> Result<(), WatchListPersistenceError>;

    /// Entries for a user in insertion order.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WatchListEntry>, WatchListPersistenceError>;
}

