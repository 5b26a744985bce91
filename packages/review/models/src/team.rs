use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

/// A user as listed inside its team, without the redundant team name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl TeamMember {
    #[must_use]
    pub fn into_user(self, team_name: &str) -> User {
        User {
            user_id: self.user_id,
            username: self.username,
            team_name: team_name.to_string(),
            is_active: self.is_active,
        }
    }
}

impl From<User> for TeamMember {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_name: String,
    pub members: Vec<TeamMember>,
}
