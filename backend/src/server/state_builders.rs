//! Builders wiring outbound adapters into domain services.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultClock;

use podwatch::config::AppSettings;
use podwatch::domain::ports::CatalogService;
use podwatch::domain::{AccountService, CatalogAccess, CatalogAccessSettings};
use podwatch::inbound::http::state::HttpState;
use podwatch::outbound::catalog::{ClientCredentials, HttpCatalogSource, HttpTokenExchange};
use podwatch::outbound::persistence::{
    DbPool, DieselPodcastRepository, DieselUserRepository, DieselWatchListRepository,
};

/// Build the catalog service from provider settings.
///
/// # Errors
/// Fails when credentials are missing, a provider URL is malformed or a
/// reqwest client cannot be built.
pub fn build_catalog_service(settings: &AppSettings) -> Result<Arc<dyn CatalogService>> {
    let timeout = settings.http_timeout();
    let credentials = ClientCredentials {
        client_id: settings.client_id()?.to_owned(),
        client_secret: settings.client_secret()?,
        redirect_uri: settings.redirect_uri().to_owned(),
    };
    let tokens = HttpTokenExchange::new(settings.token_url()?, credentials, timeout)
        .wrap_err("failed to build token exchange client")?;
    let source = HttpCatalogSource::new(settings.api_base_url()?, timeout)
        .wrap_err("failed to build catalog client")?;
    let access = CatalogAccess::new(
        Arc::new(tokens),
        Arc::new(source),
        Arc::new(DefaultClock),
        CatalogAccessSettings {
            authorize_url: settings.authorize_url()?,
            client_id: settings.client_id()?.to_owned(),
            redirect_uri: settings.redirect_uri().to_owned(),
            token_cache_ttl: settings.token_cache_ttl(),
        },
    );
    Ok(Arc::new(access))
}

/// Build handler state backed by the Diesel repositories.
pub fn build_http_state(pool: &DbPool, catalog: Arc<dyn CatalogService>) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let accounts = Arc::new(AccountService::new(users.clone()));
    HttpState {
        login: accounts.clone(),
        registration: accounts,
        users,
        podcasts: Arc::new(DieselPodcastRepository::new(pool.clone())),
        watchlist: Arc::new(DieselWatchListRepository::new(pool.clone())),
        catalog,
    }
}
