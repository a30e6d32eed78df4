//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CatalogService, LoginService, PodcastRepository, RegistrationService, UserRepository,
    WatchListRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential checks for `POST /login`.
    pub login: Arc<dyn LoginService>,
    /// Account creation for `POST /register`.
    pub registration: Arc<dyn RegistrationService>,
    /// User lookups for the home page.
    pub users: Arc<dyn UserRepository>,
    /// Stored podcast library.
    pub podcasts: Arc<dyn PodcastRepository>,
    /// Per-user watchlists.
    pub watchlist: Arc<dyn WatchListRepository>,
    /// Catalog provider access.
    pub catalog: Arc<dyn CatalogService>,
}
