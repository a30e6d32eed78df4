//! PostgreSQL-backed `WatchListRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{WatchListPersistenceError, WatchListRepository};
use crate::domain::{PodcastId, UserId, WatchListEntry};

use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::{NewWatchListEntryRow, WatchListEntryRow};
use super::pool::DbPool;
use super::schema::watchlist_entries;

/// Diesel-backed implementation of the [`WatchListRepository`] port.
#[derive(Clone)]
pub struct DieselWatchListRepository {
    pool: DbPool,
}

impl DieselWatchListRepository {
    /// Repository over a shared pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error, podcast_id: i32) -> WatchListPersistenceError {
    match classify(error) {
        DieselFailure::UniqueViolation { .. } => WatchListPersistenceError::duplicate(podcast_id),
        DieselFailure::ForeignKeyViolation { constraint } => {
            if constraint.as_deref() == Some("watchlist_entries_user_id_fkey") {
                WatchListPersistenceError::query("watchlist owner does not exist")
            } else {
                WatchListPersistenceError::podcast_not_found(podcast_id)
            }
        }
        DieselFailure::Connection(message) => WatchListPersistenceError::connection(message),
        DieselFailure::Query(message) => WatchListPersistenceError::query(message),
    }
}

fn row_to_entry(row: WatchListEntryRow) -> Result<WatchListEntry, WatchListPersistenceError> {
    let podcast_id = PodcastId::new(row.podcast_id).map_err(|err| {
        warn!(podcast_id = row.podcast_id, %err, "stored watchlist row failed validation");
        WatchListPersistenceError::query(format!("stored watchlist entry is invalid: {err}"))
    })?;
    Ok(WatchListEntry::new(UserId::from_uuid(row.user_id), podcast_id))
}

#[async_trait]
impl WatchListRepository for DieselWatchListRepository {
    async fn add(&self, entry: &WatchListEntry) -> Result<(), WatchListPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| WatchListPersistenceError::connection(pool_message(err)))?;

        let podcast_id = entry.podcast_id.get();
        let inserted = diesel::insert_into(watchlist_entries::table)
            .values(&NewWatchListEntryRow {
                user_id: *entry.user_id.as_uuid(),
                podcast_id,
            })
            .on_conflict((watchlist_entries::user_id, watchlist_entries::podcast_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, podcast_id))?;

        if inserted == 0 {
            return Err(WatchListPersistenceError::duplicate(podcast_id));
        }
        Ok(())
    }

    async fn remove(&self, entry: &WatchListEntry) -> Result<(), WatchListPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| WatchListPersistenceError::connection(pool_message(err)))?;

        let podcast_id = entry.podcast_id.get();
        diesel::delete(
            watchlist_entries::table
                .filter(watchlist_entries::user_id.eq(entry.user_id.as_uuid()))
                .filter(watchlist_entries::podcast_id.eq(podcast_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, podcast_id))?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WatchListEntry>, WatchListPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| WatchListPersistenceError::connection(pool_message(err)))?;

        let rows: Vec<WatchListEntryRow> = watchlist_entries::table
            .filter(watchlist_entries::user_id.eq(user_id.as_uuid()))
            .order(watchlist_entries::id.asc())
            .select(WatchListEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, 0))?;

        rows.into_iter().map(row_to_entry).collect()
    }
}
