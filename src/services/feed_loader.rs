use futures::future::try_join_all;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::{
    error::{AppError, AppResult},
    models::{CategoryId, Movie},
    services::{liveness::Liveness, providers::CatalogClient},
};

/// Number of movies shown per carousel on the home view
pub const HOME_PREVIEW_LIMIT: usize = 12;

/// Named feeds shown on the home view, in display order
pub const HOME_FEEDS: [(&str, CategoryId); 4] = [
    ("now-playing", CategoryId::NowPlaying),
    ("top-rated", CategoryId::TopRated),
    ("popular", CategoryId::Popular),
    ("upcoming", CategoryId::Upcoming),
];

/// All feeds of one successful load, in the order they were configured
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadedFeeds {
    feeds: Vec<(String, Vec<Movie>)>,
}

impl LoadedFeeds {
    pub fn get(&self, name: &str) -> Option<&[Movie]> {
        self.feeds
            .iter()
            .find(|(feed, _)| feed == name)
            .map(|(_, movies)| movies.as_slice())
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Movie])> {
        self.feeds
            .iter()
            .map(|(name, movies)| (name.as_str(), movies.as_slice()))
    }

    /// Same feeds cut down to their first `limit` movies
    pub fn preview(&self, limit: usize) -> LoadedFeeds {
        LoadedFeeds {
            feeds: self
                .feeds
                .iter()
                .map(|(name, movies)| (name.clone(), movies.iter().take(limit).cloned().collect()))
                .collect(),
        }
    }
}

/// Aggregate state of a [`CategorizedFeedLoader`]
#[derive(Debug, Clone)]
pub enum FeedLoadState {
    Loading,
    Ready(LoadedFeeds),
    /// At least one feed failed; none of the others are exposed
    Failed(Arc<AppError>),
}

impl FeedLoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FeedLoadState::Loading)
    }
}

#[derive(Debug)]
struct Settlement {
    state: FeedLoadState,
    /// Stamp of the most recently started load; only that load may settle
    generation: u64,
}

/// Loads a fixed set of single-page feeds concurrently
///
/// The result is all-or-nothing: the loader becomes ready only once every
/// feed has arrived, and the first failure voids the whole batch. The loader
/// starts out loading, the way a freshly mounted view does. When loads
/// overlap, only the latest one settles the state.
pub struct CategorizedFeedLoader {
    client: Arc<dyn CatalogClient>,
    feeds: Vec<(String, CategoryId)>,
    settlement: Mutex<Settlement>,
    liveness: Liveness,
}

impl CategorizedFeedLoader {
    pub fn new<S: Into<String>>(
        client: Arc<dyn CatalogClient>,
        feeds: impl IntoIterator<Item = (S, CategoryId)>,
    ) -> Self {
        Self {
            client,
            feeds: feeds
                .into_iter()
                .map(|(name, category)| (name.into(), category))
                .collect(),
            settlement: Mutex::new(Settlement {
                state: FeedLoadState::Loading,
                generation: 0,
            }),
            liveness: Liveness::new(),
        }
    }

    /// Loader for the four home carousels
    pub fn home(client: Arc<dyn CatalogClient>) -> Self {
        Self::new(client, HOME_FEEDS)
    }

    pub fn state(&self) -> FeedLoadState {
        self.lock_settlement().state.clone()
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    /// Detaches the loader from its view; in-flight results will be dropped
    pub fn teardown(&self) {
        self.liveness.teardown();
    }

    /// Fetches page 1 of every feed at once and settles the aggregate state
    ///
    /// Returns the settled state, or `None` when the result was discarded
    /// because the loader was torn down or a newer load started meanwhile.
    pub async fn load(&self) -> Option<FeedLoadState> {
        if !self.liveness.is_alive() {
            return None;
        }
        let generation = {
            let mut settlement = self.lock_settlement();
            settlement.state = FeedLoadState::Loading;
            settlement.generation += 1;
            settlement.generation
        };

        tracing::info!(
            instance = %self.liveness.id(),
            feeds = self.feeds.len(),
            provider = self.client.name(),
            "Loading categorized feeds"
        );

        let result = self.fetch_all().await;

        if !self.liveness.is_alive() {
            tracing::debug!(
                instance = %self.liveness.id(),
                "Discarding feed results delivered after teardown"
            );
            return None;
        }

        let mut settlement = self.lock_settlement();
        if settlement.generation != generation {
            tracing::debug!(
                instance = %self.liveness.id(),
                generation = generation,
                latest = settlement.generation,
                "Discarding feed results superseded by a newer load"
            );
            return None;
        }

        let settled = match result {
            Ok(feeds) => {
                tracing::info!(
                    instance = %self.liveness.id(),
                    feeds = feeds.len(),
                    "Categorized feeds ready"
                );
                FeedLoadState::Ready(feeds)
            }
            Err(e) => {
                tracing::warn!(
                    instance = %self.liveness.id(),
                    error = %e,
                    "Categorized feed load failed"
                );
                FeedLoadState::Failed(Arc::new(e))
            }
        };

        settlement.state = settled.clone();
        Some(settled)
    }

    async fn fetch_all(&self) -> AppResult<LoadedFeeds> {
        let fetches = self.feeds.iter().map(|(name, category)| {
            let client = self.client.clone();
            async move {
                client
                    .fetch_category_page(*category, 1)
                    .await
                    .map(|movies| (name.clone(), movies))
                    .map_err(|e| AppError::aggregate(name.clone(), e))
            }
        });

        // First failure wins; the remaining fetches are dropped
        let feeds = try_join_all(fetches).await?;
        Ok(LoadedFeeds { feeds })
    }

    fn lock_settlement(&self) -> std::sync::MutexGuard<'_, Settlement> {
        self.settlement
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
