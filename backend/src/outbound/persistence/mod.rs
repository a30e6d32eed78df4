//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - Repositories only translate between Diesel rows and domain types.
//! - Row structs (`models.rs`) and the schema (`schema.rs`) stay private to
//!   this module.
//! - Database errors are mapped to the port error enums.
//!
//! # Example
//!
//! ```ignore
//! use podwatch::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/podwatch")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_podcast_repository;
mod diesel_user_repository;
mod diesel_watchlist_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_podcast_repository::DieselPodcastRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_watchlist_repository::DieselWatchListRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
