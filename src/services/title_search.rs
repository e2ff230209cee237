use crate::{
    error::{AppError, AppResult},
    models::Movie,
    services::providers::CatalogClient,
};
use std::sync::Arc;

/// Path of the view that lists search results
pub const SEARCH_RESULTS_PATH: &str = "/search-results";

/// Turns free-text search input into a navigation target
///
/// Blank input (after trimming) is not submitted. Anything else is sent
/// as typed, URL-encoded into the `query` parameter.
pub fn search_location(input: &str) -> Option<String> {
    if input.trim().is_empty() {
        return None;
    }

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("query", input)
        .finish();

    Some(format!("{}?{}", SEARCH_RESULTS_PATH, query))
}

/// Service function for movie search
///
/// Delegates to the configured CatalogClient, maintaining a clean separation
/// between HTTP routing and catalog access.
pub async fn search_movies(client: Arc<dyn CatalogClient>, query: &str) -> AppResult<Vec<Movie>> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }
    client.search_movies(query).await
}
