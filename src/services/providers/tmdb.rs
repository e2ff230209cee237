/// TMDB (The Movie Database) catalog provider
///
/// Maps the catalog operations onto TMDB v3 endpoints:
/// 1. Category pages: /movie/{popular,top_rated,now_playing,upcoming} or
///    /discover/movie?with_genres={id}
/// 2. Similarity: /movie/{id}/similar
/// 3. Genre names: /genre/movie/list
/// 4. Search: /search/movie?query=
///
/// Every request carries the API key and the configured language.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ApiGenreList, ApiMoviePage, CategoryId, Genre, Movie, MovieId},
    services::providers::CatalogClient,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.catalog_language.clone(),
        )
    }

    /// Path and extra query parameters for one page of a category
    fn category_request(category: CategoryId) -> (String, Vec<(&'static str, String)>) {
        match category {
            CategoryId::Popular => ("/movie/popular".to_string(), Vec::new()),
            CategoryId::TopRated => ("/movie/top_rated".to_string(), Vec::new()),
            CategoryId::NowPlaying => ("/movie/now_playing".to_string(), Vec::new()),
            CategoryId::Upcoming => ("/movie/upcoming".to_string(), Vec::new()),
            CategoryId::Genre(id) => (
                "/discover/movie".to_string(),
                vec![("with_genres", id.to_string())],
            ),
        }
    }

    /// Issues a GET against the API and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    async fn get_movies(&self, path: &str, params: &[(&str, String)]) -> AppResult<Vec<Movie>> {
        let page: ApiMoviePage = self.get_json(path, params).await?;
        Ok(page.results.into_iter().map(Movie::from).collect())
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    async fn fetch_category_page(&self, category: CategoryId, page: u32) -> AppResult<Vec<Movie>> {
        if page == 0 {
            return Err(AppError::InvalidInput("Pages start at 1".to_string()));
        }

        let (path, mut params) = Self::category_request(category);
        params.push(("page", page.to_string()));

        let movies = self.get_movies(&path, &params).await?;

        tracing::info!(
            category = %category,
            page = page,
            results = movies.len(),
            provider = "tmdb",
            "Category page fetched"
        );

        Ok(movies)
    }

    async fn fetch_similar_movies(&self, movie_id: MovieId) -> AppResult<Vec<Movie>> {
        let path = format!("/movie/{}/similar", movie_id);
        let movies = self.get_movies(&path, &[]).await?;

        tracing::info!(
            movie_id = %movie_id,
            results = movies.len(),
            provider = "tmdb",
            "Similar movies fetched"
        );

        Ok(movies)
    }

    async fn fetch_category_names(&self) -> AppResult<Vec<Genre>> {
        let list: ApiGenreList = self.get_json("/genre/movie/list", &[]).await?;

        tracing::debug!(genres = list.genres.len(), provider = "tmdb", "Genres fetched");

        Ok(list.genres)
    }

    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let movies = self
            .get_movies("/search/movie", &[("query", query.to_string())])
            .await?;

        tracing::info!(
            query = %query,
            results = movies.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
