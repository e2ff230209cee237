/// Movie catalog abstraction
///
/// The feed layer never talks HTTP directly. Everything it needs from the
/// catalog goes through [`CatalogClient`], so loaders, the paginator and the
/// recommendation aggregator can be driven by TMDB in production and by mocks
/// in tests.
use crate::{
    error::AppResult,
    models::{CategoryId, Genre, Movie, MovieId},
};

pub mod tmdb;

/// Trait for movie catalog backends
///
/// Every method is a single one-shot request. Failures come back as
/// `Err` values and are never retried here; callers decide what a failure
/// means for their aggregate state.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of a category, in server order
    ///
    /// Pages are 1-based. An empty page means the category has no more
    /// results.
    async fn fetch_category_page(&self, category: CategoryId, page: u32) -> AppResult<Vec<Movie>>;

    /// Fetch movies similar to the given one
    async fn fetch_similar_movies(&self, movie_id: MovieId) -> AppResult<Vec<Movie>>;

    /// Fetch the catalog's genre list (identifier and display name)
    async fn fetch_category_names(&self) -> AppResult<Vec<Genre>>;

    /// Free-text movie search backing the search results view
    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
