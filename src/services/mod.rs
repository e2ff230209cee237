pub mod categories;
pub mod feed_loader;
pub mod liveness;
pub mod paginator;
pub mod providers;
pub mod recommendations;
pub mod title_search;

pub use categories::category_display_name;
pub use feed_loader::{CategorizedFeedLoader, FeedLoadState, LoadedFeeds, HOME_PREVIEW_LIMIT};
pub use liveness::Liveness;
pub use paginator::{FeedSnapshot, InfiniteScrollPaginator, LoadOutcome};
pub use providers::{tmdb::TmdbClient, CatalogClient};
pub use recommendations::{recommend, RecommendationAggregator, RECOMMENDATION_LIMIT};
pub use title_search::{search_location, search_movies};

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted catalog used by the service tests

    use std::{
        collections::{HashMap, VecDeque},
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
        time::Duration,
    };

    use tokio::sync::Semaphore;

    use crate::{
        error::{AppError, AppResult},
        models::{CategoryId, Genre, Movie, MovieId},
        services::providers::CatalogClient,
    };

    pub(crate) fn movies(ids: impl IntoIterator<Item = u64>) -> Vec<Movie> {
        ids.into_iter()
            .map(|id| Movie::new(id, format!("Movie {}", id)))
            .collect()
    }

    pub(crate) fn ids(movies: &[Movie]) -> Vec<u64> {
        movies.iter().map(|m| m.id.0).collect()
    }

    /// Catalog whose responses are queued up front
    ///
    /// Category pages are served from a per-category queue; an exhausted
    /// queue answers with an empty page. When gated, every request waits for
    /// a permit from [`ScriptedCatalog::release`] before answering.
    #[derive(Default)]
    pub(crate) struct ScriptedCatalog {
        pages: Mutex<HashMap<CategoryId, VecDeque<Result<Vec<Movie>, String>>>>,
        similar: HashMap<MovieId, (Result<Vec<Movie>, String>, Duration)>,
        gate: Option<Arc<Semaphore>>,
        page_requests: Mutex<Vec<(CategoryId, u32)>>,
        similar_calls: AtomicUsize,
    }

    impl ScriptedCatalog {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn gated(mut self) -> Self {
            self.gate = Some(Arc::new(Semaphore::new(0)));
            self
        }

        pub(crate) fn page(self, category: CategoryId, ids: impl IntoIterator<Item = u64>) -> Self {
            self.push_page(category, Ok(movies(ids)));
            self
        }

        pub(crate) fn failing_page(self, category: CategoryId) -> Self {
            self.push_page(category, Err(format!("{} unavailable", category)));
            self
        }

        pub(crate) fn similar(
            mut self,
            movie_id: u64,
            ids: impl IntoIterator<Item = u64>,
            delay: Duration,
        ) -> Self {
            self.similar
                .insert(MovieId(movie_id), (Ok(movies(ids)), delay));
            self
        }

        pub(crate) fn failing_similar(mut self, movie_id: u64) -> Self {
            self.similar.insert(
                MovieId(movie_id),
                (Err(format!("similar {} unavailable", movie_id)), Duration::ZERO),
            );
            self
        }

        /// Lets one gated request through
        pub(crate) fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.add_permits(1);
            }
        }

        pub(crate) fn page_requests(&self) -> Vec<(CategoryId, u32)> {
            self.page_requests.lock().unwrap().clone()
        }

        pub(crate) fn similar_calls(&self) -> usize {
            self.similar_calls.load(Ordering::SeqCst)
        }

        fn push_page(&self, category: CategoryId, page: Result<Vec<Movie>, String>) {
            self.pages
                .lock()
                .unwrap()
                .entry(category)
                .or_default()
                .push_back(page);
        }

        async fn pass_gate(&self) {
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
        }
    }

    #[async_trait::async_trait]
    impl CatalogClient for ScriptedCatalog {
        async fn fetch_category_page(
            &self,
            category: CategoryId,
            page: u32,
        ) -> AppResult<Vec<Movie>> {
            self.page_requests.lock().unwrap().push((category, page));
            self.pass_gate().await;

            let next = self
                .pages
                .lock()
                .unwrap()
                .get_mut(&category)
                .and_then(|queue| queue.pop_front());

            match next {
                Some(Ok(movies)) => Ok(movies),
                Some(Err(reason)) => Err(AppError::ExternalApi(reason)),
                None => Ok(Vec::new()),
            }
        }

        async fn fetch_similar_movies(&self, movie_id: MovieId) -> AppResult<Vec<Movie>> {
            self.similar_calls.fetch_add(1, Ordering::SeqCst);
            self.pass_gate().await;

            match self.similar.get(&movie_id) {
                Some((result, delay)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(*delay).await;
                    }
                    result.clone().map_err(AppError::ExternalApi)
                }
                None => Ok(Vec::new()),
            }
        }

        async fn fetch_category_names(&self) -> AppResult<Vec<Genre>> {
            Ok(vec![
                Genre {
                    id: 28,
                    name: "Ação".to_string(),
                },
                Genre {
                    id: 35,
                    name: "Comédia".to_string(),
                },
            ])
        }

        async fn search_movies(&self, _query: &str) -> AppResult<Vec<Movie>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }
}
