use std::sync::Arc;

use reviewflow_review::ReviewService;
use reviewflow_store::{InMemoryStore, ReviewStore};

pub struct AppState {
    pub service: ReviewService,
}

impl AppState {
    #[must_use]
    pub const fn new(service: ReviewService) -> Self {
        Self { service }
    }

    /// State backed by a fresh [`InMemoryStore`].
    #[must_use]
    pub fn in_memory(rng_seed: Option<u64>) -> Self {
        let store: Arc<dyn ReviewStore> = Arc::new(InMemoryStore::new());

        let service = match rng_seed {
            Some(seed) => ReviewService::seeded(store, seed),
            None => ReviewService::new(store),
        };

        Self::new(service)
    }
}
