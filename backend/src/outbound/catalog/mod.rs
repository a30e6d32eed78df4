//! Catalog provider outbound adapters.
//!
//! Thin HTTP implementations of the `TokenExchange` and `CatalogSource`
//! ports. Each call makes exactly one request with the client's timeout.

mod dto;
mod http_catalog_source;
mod http_token_exchange;
mod transport;

pub use http_catalog_source::{CatalogClientBuildError, HttpCatalogSource};
pub use http_token_exchange::{ClientCredentials, HttpTokenExchange};
