//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **catalog**: reqwest clients for the podcast catalog provider
//!
//! Adapters translate between domain types and infrastructure representations
//! and contain no business logic.

pub mod catalog;
pub mod persistence;
