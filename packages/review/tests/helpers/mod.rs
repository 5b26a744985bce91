pub mod racing;

use std::sync::Arc;

use chrono::Utc;
use reviewflow_review::ReviewService;
use reviewflow_review::models::{
    AddTeamRequest, PullRequest, PullRequestReviewer, TeamMember,
};
use reviewflow_store::{InMemoryStore, PrRepository, ReviewStore};

use racing::RacingStore;

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub service: ReviewService,
}

#[must_use]
pub fn member(user_id: &str, is_active: bool) -> TeamMember {
    TeamMember {
        user_id: user_id.to_string(),
        username: user_id.to_string(),
        is_active,
    }
}

impl Fixture {
    #[must_use]
    pub fn empty(seed: u64) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let shared: Arc<dyn ReviewStore> = store.clone();

        Self {
            store,
            service: ReviewService::seeded(shared, seed),
        }
    }

    /// "backend" with alice, bob, carol and dave active, plus "frontend" with
    /// erin.
    pub async fn backend(seed: u64) -> Self {
        let fixture = Self::empty(seed);
        fixture.seed_teams().await;
        fixture
    }

    /// The [`backend`](Self::backend) teams behind a [`RacingStore`]. `store`
    /// still points at the wrapped store, so setup and assertions skip the
    /// races.
    pub async fn racing(seed: u64) -> (Self, Arc<RacingStore>) {
        let store = Arc::new(InMemoryStore::new());
        let racing = Arc::new(RacingStore::new(store.clone()));
        let shared: Arc<dyn ReviewStore> = racing.clone();

        let fixture = Self {
            store,
            service: ReviewService::seeded(shared, seed),
        };
        fixture.seed_teams().await;

        (fixture, racing)
    }

    async fn seed_teams(&self) {
        self.add_team(
            "backend",
            vec![
                member("alice", true),
                member("bob", true),
                member("carol", true),
                member("dave", true),
            ],
        )
        .await;
        self.add_team("frontend", vec![member("erin", true)]).await;
    }

    pub async fn add_team(&self, team_name: &str, members: Vec<TeamMember>) {
        self.service
            .add_team(AddTeamRequest {
                team_name: team_name.to_string(),
                members,
            })
            .await
            .unwrap();
    }

    /// Write an open pull request with a fixed reviewer set, bypassing random
    /// selection.
    pub async fn open_pr_with(&self, pull_request_id: &str, author_id: &str, reviewers: &[&str]) {
        let now = Utc::now();
        let pr = PullRequest::open(pull_request_id, "fixture", author_id, now);
        let rows: Vec<PullRequestReviewer> = reviewers
            .iter()
            .map(|user_id| PullRequestReviewer::new(pull_request_id, *user_id, now))
            .collect();

        self.store
            .create_pr_with_reviewers(&pr, &rows)
            .await
            .unwrap();
    }

    pub async fn reviewers_of(&self, pull_request_id: &str) -> Vec<String> {
        self.store
            .find_pr(pull_request_id)
            .await
            .unwrap()
            .unwrap()
            .reviewers
            .into_iter()
            .map(|r| r.user_id)
            .collect()
    }
}
