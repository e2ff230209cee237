use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    error::AppError,
    models::{CategoryId, Movie},
    services::{liveness::Liveness, providers::CatalogClient},
};

/// What a single `load_more` signal ended up doing
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// A page arrived and this many movies were appended
    Appended(usize),
    /// The page came back empty; the feed is finished
    Exhausted,
    /// The fetch failed; the same page will be requested next time
    Failed(Arc<AppError>),
    /// Ignored because a fetch is already in flight or the feed is finished
    Skipped,
    /// The result arrived after teardown and was thrown away
    Discarded,
}

/// Point-in-time copy of a paginated feed
#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    pub category: String,
    pub items: Vec<Movie>,
    /// Next page to request
    pub page: u32,
    pub loading: bool,
    pub exhausted: bool,
    /// Message of the last failed attempt, cleared by the next success
    pub error: Option<String>,
}

#[derive(Debug)]
struct Cursor {
    page: u32,
    in_flight: bool,
    exhausted: bool,
    activated: bool,
    error: Option<Arc<AppError>>,
    items: Vec<Movie>,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            page: 1,
            in_flight: false,
            exhausted: false,
            activated: false,
            error: None,
            items: Vec::new(),
        }
    }
}

fn lock(cursor: &Mutex<Cursor>) -> MutexGuard<'_, Cursor> {
    cursor.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Clears the in-flight flag when a fetch is abandoned before it settles
struct InFlight<'a> {
    cursor: &'a Mutex<Cursor>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            lock(self.cursor).in_flight = false;
            tracing::debug!("Page fetch abandoned before settling");
        }
    }
}

/// Infinite-scroll driver for one category
///
/// Each `load_more` fetches the cursor's current page and appends it. At most
/// one fetch is in flight per paginator; signals that arrive meanwhile are
/// dropped. A failure leaves the page number where it was so the next signal
/// retries it, and an empty page ends the feed for good.
pub struct InfiniteScrollPaginator {
    client: Arc<dyn CatalogClient>,
    category: CategoryId,
    cursor: Mutex<Cursor>,
    liveness: Liveness,
}

impl InfiniteScrollPaginator {
    pub fn new(client: Arc<dyn CatalogClient>, category: CategoryId) -> Self {
        Self {
            client,
            category,
            cursor: Mutex::new(Cursor::default()),
            liveness: Liveness::new(),
        }
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub fn teardown(&self) {
        self.liveness.teardown();
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let cursor = self.lock_cursor();
        FeedSnapshot {
            category: self.category.to_string(),
            items: cursor.items.clone(),
            page: cursor.page,
            loading: cursor.in_flight,
            exhausted: cursor.exhausted,
            error: cursor.error.as_ref().map(|e| e.to_string()),
        }
    }

    /// Fetches page 1 the first time the feed is shown; later calls do nothing
    pub async fn activate(&self) -> LoadOutcome {
        {
            let mut cursor = self.lock_cursor();
            if cursor.activated {
                return LoadOutcome::Skipped;
            }
            cursor.activated = true;
        }
        self.load_more().await
    }

    /// Handles a "near the bottom" signal from the consumer
    pub async fn load_more(&self) -> LoadOutcome {
        let page = {
            let mut cursor = self.lock_cursor();
            if cursor.in_flight || cursor.exhausted || !self.liveness.is_alive() {
                tracing::trace!(
                    category = %self.category,
                    in_flight = cursor.in_flight,
                    exhausted = cursor.exhausted,
                    "Ignoring load-more signal"
                );
                return LoadOutcome::Skipped;
            }
            cursor.in_flight = true;
            cursor.activated = true;
            cursor.page
        };

        let mut in_flight = InFlight {
            cursor: &self.cursor,
            settled: false,
        };

        tracing::debug!(category = %self.category, page = page, "Loading page");

        let result = self.client.fetch_category_page(self.category, page).await;

        in_flight.settled = true;
        let mut cursor = self.lock_cursor();
        cursor.in_flight = false;

        if !self.liveness.is_alive() {
            tracing::debug!(
                instance = %self.liveness.id(),
                category = %self.category,
                page = page,
                "Discarding page delivered after teardown"
            );
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(movies) if movies.is_empty() => {
                cursor.exhausted = true;
                cursor.error = None;
                tracing::info!(
                    category = %self.category,
                    page = page,
                    total = cursor.items.len(),
                    "Feed exhausted"
                );
                LoadOutcome::Exhausted
            }
            Ok(movies) => {
                let appended = movies.len();
                cursor.items.extend(movies);
                match page.checked_add(1) {
                    Some(next) => cursor.page = next,
                    None => cursor.exhausted = true,
                }
                cursor.error = None;
                tracing::info!(
                    category = %self.category,
                    page = page,
                    appended = appended,
                    total = cursor.items.len(),
                    "Page appended"
                );
                LoadOutcome::Appended(appended)
            }
            Err(e) => {
                tracing::warn!(
                    category = %self.category,
                    page = page,
                    error = %e,
                    "Page fetch failed"
                );
                let error = Arc::new(e);
                cursor.error = Some(error.clone());
                LoadOutcome::Failed(error)
            }
        }
    }

    fn lock_cursor(&self) -> MutexGuard<'_, Cursor> {
        lock(&self.cursor)
    }
}
