//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `username` is unique.
    users (id) {
        id -> Uuid,
        #[max_length = 30]
        username -> Varchar,
        #[max_length = 254]
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        admin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stored podcast library. `show_id` is unique.
    podcasts (id) {
        id -> Int4,
        title -> Text,
        host -> Text,
        description -> Text,
        image_url -> Nullable<Text>,
        #[max_length = 64]
        show_id -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Watchlist membership. Unique on `(user_id, podcast_id)`; `id` keeps
    /// insertion order.
    watchlist_entries (id) {
        id -> Int8,
        user_id -> Uuid,
        podcast_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(watchlist_entries -> users (user_id));
diesel::joinable!(watchlist_entries -> podcasts (podcast_id));

diesel::allow_tables_to_appear_in_same_query!(podcasts, users, watchlist_entries);
