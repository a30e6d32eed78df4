//! PostgreSQL-backed `PodcastRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{PodcastPersistenceError, PodcastRepository};
use crate::domain::{NewPodcast, Podcast, PodcastId};

use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::{NewPodcastRow, PodcastRow};
use super::pool::DbPool;
use super::schema::{podcasts, watchlist_entries};

/// Diesel-backed implementation of the [`PodcastRepository`] port.
#[derive(Clone)]
pub struct DieselPodcastRepository {
    pool: DbPool,
}

impl DieselPodcastRepository {
    /// Repository over a shared pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PodcastPersistenceError {
    match classify(error) {
        DieselFailure::UniqueViolation { constraint } => PodcastPersistenceError::query(format!(
            "unexpected unique violation on {}",
            constraint.as_deref().unwrap_or("unknown constraint")
        )),
        DieselFailure::ForeignKeyViolation { .. } => {
            PodcastPersistenceError::query("unexpected foreign key violation")
        }
        DieselFailure::Connection(message) => PodcastPersistenceError::connection(message),
        DieselFailure::Query(message) => PodcastPersistenceError::query(message),
    }
}

fn row_to_podcast(row: PodcastRow) -> Result<Podcast, PodcastPersistenceError> {
    let id = row.id;
    let invalid = |err: crate::domain::PodcastValidationError| {
        warn!(podcast_id = id, %err, "stored podcast row failed validation");
        PodcastPersistenceError::query(format!("stored podcast is invalid: {err}"))
    };
    let podcast = NewPodcast::try_from_parts(
        &row.title,
        &row.host,
        &row.description,
        row.image_url.as_deref(),
        &row.show_id,
    )
    .map_err(invalid)?;
    Ok(podcast.into_podcast(PodcastId::new(id).map_err(invalid)?))
}

fn rows_to_podcasts(rows: Vec<PodcastRow>) -> Result<Vec<Podcast>, PodcastPersistenceError> {
    rows.into_iter().map(row_to_podcast).collect()
}

#[async_trait]
impl PodcastRepository for DieselPodcastRepository {
    async fn add(&self, podcast: &NewPodcast) -> Result<Podcast, PodcastPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PodcastPersistenceError::connection(pool_message(err)))?;

        let row = NewPodcastRow {
            title: podcast.title(),
            host: podcast.host(),
            description: podcast.description(),
            image_url: podcast.image_url(),
            show_id: podcast.show_id().as_ref(),
        };

        let stored: Option<PodcastRow> = diesel::insert_into(podcasts::table)
            .values(&row)
            .on_conflict(podcasts::show_id)
            .do_nothing()
            .returning(PodcastRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match stored {
            Some(row) => row_to_podcast(row),
            None => Err(PodcastPersistenceError::duplicate_show(
                podcast.show_id().as_ref(),
            )),
        }
    }

    async fn find_by_id(&self, id: PodcastId) -> Result<Option<Podcast>, PodcastPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PodcastPersistenceError::connection(pool_message(err)))?;

        let row: Option<PodcastRow> = podcasts::table
            .filter(podcasts::id.eq(id.get()))
            .select(PodcastRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_podcast).transpose()
    }

    async fn find_by_ids(&self, ids: &[PodcastId]) -> Result<Vec<Podcast>, PodcastPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PodcastPersistenceError::connection(pool_message(err)))?;

        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<PodcastRow> = podcasts::table
            .filter(podcasts::id.eq_any(raw_ids))
            .order(podcasts::id.asc())
            .select(PodcastRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_podcasts(rows)
    }

    async fn list_all(&self) -> Result<Vec<Podcast>, PodcastPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PodcastPersistenceError::connection(pool_message(err)))?;

        let rows: Vec<PodcastRow> = podcasts::table
            .order(podcasts::id.asc())
            .select(PodcastRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_podcasts(rows)
    }

    async fn delete(&self, id: PodcastId) -> Result<bool, PodcastPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PodcastPersistenceError::connection(pool_message(err)))?;

        let raw_id = id.get();
        conn.transaction::<_, diesel::result::Error, _>(|tx| {
            async move {
                diesel::delete(watchlist_entries::table.filter(watchlist_entries::podcast_id.eq(raw_id)))
                    .execute(tx)
                    .await?;
                let removed = diesel::delete(podcasts::table.filter(podcasts::id.eq(raw_id)))
                    .execute(tx)
                    .await?;
                Ok(removed > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, show_id: &str) -> PodcastRow {
        PodcastRow {
            id,
            title: "Cat Talk".to_owned(),
            host: "Jo".to_owned(),
            description: String::new(),
            image_url: Some(String::new()),
            show_id: show_id.to_owned(),
        }
    }

    #[test]
    fn converts_rows_and_drops_blank_images() {
        let podcast = row_to_podcast(row(3, "abc123")).expect("valid row");
        assert_eq!(podcast.id().get(), 3);
        assert_eq!(podcast.show_id().as_ref(), "abc123");
        assert_eq!(podcast.image_url(), None);
    }

    #[test]
    fn rejects_rows_with_invalid_ids() {
        let err = row_to_podcast(row(0, "abc123")).expect_err("id must be positive");
        assert!(matches!(err, PodcastPersistenceError::Query { .. }));
    }

    #[test]
    fn rejects_rows_with_invalid_show_ids() {
        let err = row_to_podcast(row(1, "not valid!")).expect_err("invalid show id");
        assert!(matches!(err, PodcastPersistenceError::Query { .. }));
    }
}
