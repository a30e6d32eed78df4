//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_service;
mod catalog_source;
mod login_service;
mod podcast_repository;
mod registration_service;
mod token_exchange;
mod user_repository;
mod watchlist_repository;

pub use catalog_service::CatalogService;
#[cfg(test)]
pub use catalog_service::MockCatalogService;
pub use catalog_source::{CatalogSource, CatalogSourceError};
#[cfg(test)]
pub use catalog_source::MockCatalogSource;
pub use login_service::{INVALID_CREDENTIALS_MESSAGE, LoginService};
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use podcast_repository::MockPodcastRepository;
pub use podcast_repository::{PodcastPersistenceError, PodcastRepository};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use token_exchange::MockTokenExchange;
pub use token_exchange::{TokenExchange, TokenExchangeError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use watchlist_repository::MockWatchListRepository;
pub use watchlist_repository::{WatchListPersistenceError, WatchListRepository};
