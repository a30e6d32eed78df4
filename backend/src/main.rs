//! podwatch entry-point: loads configuration, migrates the database and
//! serves the HTTP pages.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use podwatch::config::AppSettings;
use podwatch::inbound::http::health::HealthState;
use podwatch::inbound::http::session_config::{BuildMode, session_settings_from_env};
use podwatch::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerConfig, create_server, state_builders::build_catalog_service};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .wrap_err("invalid session configuration")?;
    info!(key = %session.key_fingerprint(), "session key loaded");

    let database_url = settings.database_url()?;
    run_pending_migrations(database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let catalog = build_catalog_service(&settings)?;
    let bind_addr = settings.bind_addr()?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        ServerConfig::new(session, bind_addr, pool, catalog),
    )?;
    info!(%bind_addr, "podwatch listening");
    server.await?;
    Ok(())
}
