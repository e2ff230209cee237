//! Feed aggregation layer for the TelaViva movie catalog browser
//!
//! Loads the categorized home feeds, paginates single categories for infinite
//! scroll and derives recommendations from the user's tracked movies, all on
//! top of a pluggable [`services::CatalogClient`].

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
