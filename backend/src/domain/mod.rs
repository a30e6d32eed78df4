//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! adapters, and the use-cases that coordinate them. Types are immutable once
//! validated; invariants are documented on each type.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Podcast, WatchListEntry: stored records.
//! - RequestContext: per-request identity and catalog authorization.
//! - AccountService, CatalogAccess: use-case implementations behind the
//!   driving ports in [`ports`].

pub mod access;
pub mod account_service;
pub mod auth;
pub mod catalog;
pub mod catalog_access;
pub mod episode_search;
pub mod error;
pub mod password;
pub mod podcast;
pub mod ports;
pub mod user;
pub mod watchlist;

pub use self::access::{
    ADMIN_REQUIRED_MESSAGE, CATALOG_AUTHORIZATION_REQUIRED, LOGIN_REQUIRED_MESSAGE,
    RequestContext, Viewer,
};
pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, NewUserAccount, Registration,
    RegistrationValidationError, UserAccount,
};
pub use self::catalog::{
    AuthorizationCode, BearerToken, CatalogValidationError, EPISODE_PAGE_SIZE, EpisodeOffset,
    EpisodeSummary, Keyword, ShowRecord,
};
pub use self::catalog_access::{CatalogAccess, CatalogAccessSettings};
pub use self::episode_search::{KeywordMatches, match_keyword};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::password::{PASSWORD_MIN, PasswordDigest, PasswordHashingError, PlainPassword};
pub use self::podcast::{NewPodcast, Podcast, PodcastId, PodcastValidationError, ShowId};
pub use self::user::{EmailAddress, User, UserId, UserValidationError, Username};
pub use self::watchlist::{WatchListEntry, contains_podcast, podcasts_in_entry_order};

/// Convenient result alias for handlers and services.
///
/// # Examples
/// ```
/// use podwatch::domain::{ApiResult, Error};
///
/// fn guard() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(guard().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
