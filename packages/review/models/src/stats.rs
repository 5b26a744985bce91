use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team_name: String,
    pub total_members: u64,
    pub active_members: u64,
    pub total_prs: u64,
    pub open_prs: u64,
    pub merged_prs: u64,
    /// Mean of `merged_at - created_at` over merged PRs, `0.0` when none.
    pub avg_merge_time_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: String,
    pub username: String,
    pub authored_prs: u64,
    pub open_authored_prs: u64,
    pub merged_authored_prs: u64,
    pub assigned_reviews: u64,
}
