use futures::stream::{self, StreamExt, TryStreamExt};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, TrackedSet},
    services::{liveness::Liveness, providers::CatalogClient},
};

/// Maximum number of recommendations surfaced at once
pub const RECOMMENDATION_LIMIT: usize = 12;

/// Derives "recommended for you" from the user's tracked movies
///
/// Looks up similar movies for every tracked identifier (watched first, then
/// to-watch, each identifier once), concatenates the candidates in issuance
/// order, keeps the first occurrence of every movie and stops at
/// [`RECOMMENDATION_LIMIT`].
///
/// Up to `concurrency` lookups run at once. Results are consumed in the order
/// the lookups were issued, so the output does not depend on which response
/// lands first. Any failed lookup fails the whole derivation.
pub async fn recommend(
    client: Arc<dyn CatalogClient>,
    snapshot: &TrackedSet,
    concurrency: usize,
) -> AppResult<Vec<Movie>> {
    let tracked = snapshot.tracked_ids();
    if tracked.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!(
        tracked = tracked.len(),
        concurrency = concurrency,
        provider = client.name(),
        "Deriving recommendations"
    );

    let candidates: Vec<Vec<Movie>> = stream::iter(tracked)
        .map(|movie_id| {
            let client = client.clone();
            async move {
                client
                    .fetch_similar_movies(movie_id)
                    .await
                    .map_err(|e| AppError::aggregate(format!("similar:{}", movie_id), e))
            }
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let recommendations = dedup_and_cap(candidates.into_iter().flatten(), RECOMMENDATION_LIMIT);

    tracing::info!(
        recommendations = recommendations.len(),
        "Recommendations derived"
    );

    Ok(recommendations)
}

/// Keeps the first occurrence of each movie, up to `limit` entries
fn dedup_and_cap(candidates: impl IntoIterator<Item = Movie>, limit: usize) -> Vec<Movie> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|movie| seen.insert(movie.id))
        .take(limit)
        .collect()
}

#[derive(Debug, Default)]
struct Derivation {
    snapshot: Option<TrackedSet>,
    recommendations: Vec<Movie>,
    error: Option<Arc<AppError>>,
    /// Stamp of the most recently started refresh
    generation: u64,
    /// Stamp of the refresh the current list came from
    applied: u64,
}

/// Keeps a recommendation list in step with the tracked sets
///
/// `refresh` rebuilds the list only when the snapshot differs from the one
/// the current list was derived from. A failed derivation leaves an empty
/// list with the error recorded. Only the most recently started refresh may
/// write its result; an older one that settles late is dropped.
pub struct RecommendationAggregator {
    client: Arc<dyn CatalogClient>,
    concurrency: usize,
    state: Mutex<Derivation>,
    liveness: Liveness,
}

impl RecommendationAggregator {
    pub fn new(client: Arc<dyn CatalogClient>, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
            state: Mutex::new(Derivation::default()),
            liveness: Liveness::new(),
        }
    }

    pub fn recommendations(&self) -> Vec<Movie> {
        self.lock_state().recommendations.clone()
    }

    pub fn error(&self) -> Option<Arc<AppError>> {
        self.lock_state().error.clone()
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub fn teardown(&self) {
        self.liveness.teardown();
    }

    /// Re-derives the list if `snapshot` changed since the last derivation
    ///
    /// Returns `false` when nothing was applied: the snapshot was
    /// unchanged, the aggregator was torn down before the lookups settled,
    /// or a newer refresh started in the meantime.
    pub async fn refresh(&self, snapshot: &TrackedSet) -> bool {
        if !self.liveness.is_alive() {
            return false;
        }
        let generation = {
            let mut state = self.lock_state();
            if state.generation == state.applied && state.snapshot.as_ref() == Some(snapshot) {
                tracing::debug!("Tracked sets unchanged, keeping recommendations");
                return false;
            }
            state.generation += 1;
            state.generation
        };

        let result = recommend(self.client.clone(), snapshot, self.concurrency).await;

        if !self.liveness.is_alive() {
            tracing::debug!(
                instance = %self.liveness.id(),
                "Discarding recommendations delivered after teardown"
            );
            return false;
        }

        let mut state = self.lock_state();
        if state.generation != generation {
            tracing::debug!(
                generation = generation,
                latest = state.generation,
                "Discarding recommendations superseded by a newer refresh"
            );
            return false;
        }
        state.applied = generation;
        state.snapshot = Some(snapshot.clone());
        match result {
            Ok(recommendations) => {
                state.recommendations = recommendations;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation derivation failed");
                state.recommendations = Vec::new();
                state.error = Some(Arc::new(e));
            }
        }
        true
    }

    fn lock_state(&self) -> MutexGuard<'_, Derivation> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
