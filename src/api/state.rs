use std::sync::Arc;

use crate::{
    config::Config,
    services::{CatalogClient, TmdbClient},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    /// Similarity lookups allowed in flight per recommendation request
    pub similarity_concurrency: usize,
}

impl AppState {
    /// Creates state around an existing catalog client
    pub fn new(catalog: Arc<dyn CatalogClient>, similarity_concurrency: usize) -> Self {
        Self {
            catalog,
            similarity_concurrency: similarity_concurrency.max(1),
        }
    }

    /// Creates state backed by TMDB
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(TmdbClient::from_config(config)),
            config.similarity_concurrency,
        )
    }
}
