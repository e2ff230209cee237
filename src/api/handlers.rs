use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{CategoryId, Genre, Movie, TrackedSet},
    services::{
        category_display_name, recommend, search_location, search_movies, CategorizedFeedLoader,
        FeedLoadState, HOME_PREVIEW_LIMIT,
    },
};

use super::AppState;

// Request/Response types

/// One home carousel
#[derive(Debug, Serialize)]
pub struct HomeFeed {
    pub name: String,
    pub movies: Vec<Movie>,
}

/// Home carousels in display order
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub feeds: Vec<HomeFeed>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct FeedPageResponse {
    pub category: String,
    pub page: u32,
    pub results: Vec<Movie>,
    /// Absent once the category returned an empty page
    pub next_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CategoryNameResponse {
    pub category: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultsQuery {
    #[serde(default)]
    pub query: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Home carousels: the four standard feeds, cut to preview length
pub async fn home(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<HomeResponse>> {
    let loader = CategorizedFeedLoader::home(state.catalog.clone());

    match loader.load().await {
        Some(FeedLoadState::Ready(feeds)) => {
            let feeds = feeds
                .preview(HOME_PREVIEW_LIMIT)
                .iter()
                .map(|(name, movies)| HomeFeed {
                    name: name.to_string(),
                    movies: movies.to_vec(),
                })
                .collect();
            Ok(Json(HomeResponse { feeds }))
        }
        Some(FeedLoadState::Failed(e)) => {
            tracing::warn!(
                request_id = %request_id,
                member = e.failed_member(),
                error = %e,
                "Home feeds unavailable"
            );
            Err(AppError::Shared(e))
        }
        Some(FeedLoadState::Loading) | None => Err(AppError::Internal(
            "Home feed load did not settle".to_string(),
        )),
    }
}

/// One page of a category listing
pub async fn feed_page(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<FeedPageResponse>> {
    let category: CategoryId = category.parse()?;
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(AppError::InvalidInput("Pages start at 1".to_string()));
    }

    let results = state.catalog.fetch_category_page(category, page).await?;
    let next_page = if results.is_empty() {
        None
    } else {
        page.checked_add(1)
    };

    Ok(Json(FeedPageResponse {
        category: category.to_string(),
        page,
        results,
        next_page,
    }))
}

/// All genres known to the catalog
pub async fn get_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.catalog.fetch_category_names().await?;
    Ok(Json(genres))
}

/// Display name of a category
pub async fn get_category_name(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<CategoryNameResponse>> {
    let category: CategoryId = category.parse()?;
    let name = category_display_name(state.catalog.clone(), category).await?;
    Ok(Json(CategoryNameResponse {
        category: category.to_string(),
        name,
    }))
}

/// Recommendations derived from a tracked-set snapshot
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(snapshot): Json<TrackedSet>,
) -> AppResult<Json<Vec<Movie>>> {
    tracing::info!(
        request_id = %request_id,
        watched = snapshot.watched.len(),
        to_watch = snapshot.to_watch.len(),
        "Processing recommendation request"
    );

    let movies = recommend(
        state.catalog.clone(),
        &snapshot,
        state.similarity_concurrency,
    )
    .await?;

    Ok(Json(movies))
}

/// Search submission; redirects to the results view
pub async fn submit_search(Json(request): Json<SearchRequest>) -> AppResult<Redirect> {
    let location = search_location(&request.query).ok_or_else(|| {
        AppError::InvalidInput("Search query cannot be empty".to_string())
    })?;
    Ok(Redirect::to(&location))
}

/// Search results view
pub async fn search_results(
    State(state): State<AppState>,
    Query(params): Query<SearchResultsQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = search_movies(state.catalog.clone(), &params.query).await?;
    Ok(Json(movies))
}
