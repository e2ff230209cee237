use crate::{
    error::AppResult,
    models::{CategoryId, Genre},
    services::providers::CatalogClient,
};
use std::sync::Arc;

/// Title shown when a genre id is not in the catalog's list
pub const FALLBACK_CATEGORY_NAME: &str = "Categoria";

/// Resolves a category to the name shown above its listing
///
/// Built-in lists have fixed labels and need no request. Genres are looked
/// up in the catalog's genre list.
pub async fn category_display_name(
    client: Arc<dyn CatalogClient>,
    category: CategoryId,
) -> AppResult<String> {
    let genre_id = match category {
        CategoryId::Genre(id) => id,
        builtin => return Ok(builtin.label().unwrap_or(FALLBACK_CATEGORY_NAME).to_string()),
    };

    let genres = client.fetch_category_names().await?;
    Ok(resolve_genre_name(&genres, genre_id))
}

fn resolve_genre_name(genres: &[Genre], genre_id: u64) -> String {
    match genres.iter().find(|genre| genre.id == genre_id) {
        Some(genre) => genre.name.clone(),
        None => {
            tracing::debug!(genre_id = genre_id, "Unknown genre, using fallback name");
            FALLBACK_CATEGORY_NAME.to_string()
        }
    }
}
