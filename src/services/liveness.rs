use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use uuid::Uuid;

/// Tracks whether the view that owns a loader is still mounted
///
/// Fetches are never aborted. Instead each settling fetch checks the flag and
/// throws its result away once the owner has been torn down. Clones share the
/// same flag.
#[derive(Debug, Clone)]
pub struct Liveness {
    id: Uuid,
    alive: Arc<AtomicBool>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Instance identifier used in log fields
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Marks the owner as gone; irreversible
    pub fn teardown(&self) {
        if self.alive.swap(false, Ordering::AcqRel) {
            tracing::debug!(instance = %self.id, "Loader torn down");
        }
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
