//! Diesel row types. Internal to the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{podcasts, users, watchlist_entries};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
    #[expect(dead_code, reason = "audit column not surfaced in the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub admin: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = podcasts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PodcastRow {
    pub id: i32,
    pub title: String,
    pub host: String,
    pub description: String,
    pub image_url: Option<String>,
    pub show_id: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = podcasts)]
pub(crate) struct NewPodcastRow<'a> {
    pub title: &'a str,
    pub host: &'a str,
    pub description: &'a str,
    pub image_url: Option<&'a str>,
    pub show_id: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = watchlist_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WatchListEntryRow {
    pub user_id: Uuid,
    pub podcast_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = watchlist_entries)]
pub(crate) struct NewWatchListEntryRow {
    pub user_id: Uuid,
    pub podcast_id: i32,
}
