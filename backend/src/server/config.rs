//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use podwatch::domain::ports::CatalogService;
use podwatch::inbound::http::session_config::SessionSettings;
use podwatch::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs to start listening.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) catalog: Arc<dyn CatalogService>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        db_pool: DbPool,
        catalog: Arc<dyn CatalogService>,
    ) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
            catalog,
        }
    }
}
