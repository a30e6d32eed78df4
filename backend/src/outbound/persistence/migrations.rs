//! Embedded Diesel migrations applied at startup.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be opened.
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to apply migrations: {0}")]
    Apply(String),
    /// The blocking migration task did not complete.
    #[error("migration task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn apply_pending(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply(err.to_string()))?;
    Ok(applied.len())
}

/// Apply every pending migration on a blocking thread.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a migration
/// fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || apply_pending(&url)).await??;
    info!(applied, "database migrations applied");
    Ok(())
}
