//! Embedded PostgreSQL fixtures for the repository integration suite.
//!
//! The cluster is shared across the test binary; every test gets its own
//! temporary database with migrations applied, so tests never see each
//! other's rows.

use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use podwatch::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use tokio::runtime::Runtime;

/// Runtime, pool and the database they point at.
pub struct DatabaseContext {
    /// Runtime driving the async repositories.
    pub runtime: Runtime,
    /// Pool connected to the temporary database.
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

/// Returns true when `SKIP_TEST_CLUSTER` is set to 1, true or yes.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when the environment opts out, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn setup_database() -> Result<DatabaseContext, String> {
    // Bootstrap before any runtime exists; the cluster helpers block.
    let cluster = shared_cluster_handle().map_err(|err| format!("{err:?}"))?;
    let database = cluster
        .create_temporary_database()
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_owned();

    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let pool = runtime.block_on(async {
        run_pending_migrations(&url)
            .await
            .map_err(|err| format!("migrations: {err}"))?;
        DbPool::new(PoolConfig::new(url.as_str()).with_max_size(2))
            .await
            .map_err(|err| format!("pool: {err}"))
    })?;

    Ok(DatabaseContext {
        runtime,
        pool,
        _database: database,
    })
}

/// Fresh migrated database, or `None` when the cluster is skipped.
pub fn database() -> Option<DatabaseContext> {
    match setup_database() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
