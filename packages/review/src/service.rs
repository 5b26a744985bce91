use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use reviewflow_store::ReviewStore;

/// Upper bound on reviewers assigned to one pull request.
pub const MAX_REVIEWERS: usize = 2;

/// Entry point for every review operation.
///
/// Holds the shared store and the random source used for reviewer selection.
/// The service keeps no other state, so one instance can serve every request.
pub struct ReviewService {
    pub(crate) store: Arc<dyn ReviewStore>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl ReviewService {
    /// Create a service whose reviewer selection is seeded from OS entropy.
    #[must_use]
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Create a service with reproducible reviewer selection.
    #[must_use]
    pub fn seeded(store: Arc<dyn ReviewStore>, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(store: Arc<dyn ReviewStore>, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            store,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// The guard must be released before the next `.await`.
    pub(crate) fn rng(&self) -> MutexGuard<'_, Box<dyn RngCore + Send>> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ReviewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewService").finish_non_exhaustive()
    }
}
