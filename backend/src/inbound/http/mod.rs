//! HTTP inbound adapter.
//!
//! Handlers read identity from the cookie session, call domain ports through
//! [`state::HttpState`] and answer with either a JSON page or a `303` redirect
//! carrying a session notice.

pub mod accounts;
pub mod catalog;
pub mod error;
pub mod health;
pub mod home;
pub mod page;
pub mod podcasts;
pub mod search;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod watchlist;

use actix_web::web;

/// Register every podwatch page and form handler.
///
/// Expects [`state::HttpState`] as app data and a session middleware around
/// the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home::home)
        .service(accounts::register_page)
        .service(accounts::register)
        .service(accounts::login_page)
        .service(accounts::login)
        .service(accounts::logout)
        .service(catalog::catalog_page)
        .service(catalog::catalog_search)
        .service(podcasts::list_podcasts)
        .service(podcasts::add_podcast)
        .service(podcasts::show_podcast)
        .service(podcasts::remove_podcast)
        .service(search::search_episodes)
        .service(watchlist::add_to_watchlist)
        .service(watchlist::show_watchlist)
        .service(watchlist::remove_from_watchlist);
}
