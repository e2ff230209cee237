use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::MovieId;

/// Snapshot of the user's watched and to-watch sets
///
/// The sets are owned by whatever persists them; the feed layer only reads a
/// copy taken at aggregation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackedSet {
    /// Movies the user has marked as watched
    #[serde(default)]
    pub watched: Vec<MovieId>,
    /// Movies the user has queued to watch later
    #[serde(default)]
    pub to_watch: Vec<MovieId>,
}

impl TrackedSet {
    /// Creates a snapshot from the two identifier lists
    pub fn new(watched: Vec<MovieId>, to_watch: Vec<MovieId>) -> Self {
        Self { watched, to_watch }
    }

    /// True when neither set holds a movie
    pub fn is_empty(&self) -> bool {
        self.watched.is_empty() && self.to_watch.is_empty()
    }

    /// Union of both sets, watched first, each identifier once
    pub fn tracked_ids(&self) -> Vec<MovieId> {
        let mut seen = HashSet::new();
        self.watched
            .iter()
            .chain(self.to_watch.iter())
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
