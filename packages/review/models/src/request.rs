//! Typed request payloads.
//!
//! Every string field defaults to empty when absent from the JSON body, so a
//! missing field surfaces as a [`ValidationError`] from `validate` rather than a
//! decoding failure.

use serde::{Deserialize, Serialize};

use crate::team::TeamMember;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("members[{index}].{field} is required")]
    MissingMemberField { index: usize, field: &'static str },

    #[error("user {0} is listed more than once")]
    DuplicateMember(String),
}

/// # Errors
///
/// * If `value` is empty or only whitespace
pub fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePrRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub pull_request_name: String,
    #[serde(default)]
    pub author_id: String,
}

impl CreatePrRequest {
    /// # Errors
    ///
    /// * If the pull request id or the author id is empty
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.pull_request_id, "pull_request_id")?;
        require(&self.author_id, "author_id")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePrRequest {
    #[serde(default)]
    pub pull_request_id: String,
}

impl MergePrRequest {
    /// # Errors
    ///
    /// * If the pull request id is empty
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.pull_request_id, "pull_request_id")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignPrRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub old_reviewer_id: String,
}

impl ReassignPrRequest {
    /// # Errors
    ///
    /// * If the pull request id or the old reviewer id is empty
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.pull_request_id, "pull_request_id")?;
        require(&self.old_reviewer_id, "old_reviewer_id")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTeamRequest {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl AddTeamRequest {
    /// # Errors
    ///
    /// * If the team name is empty
    /// * If any member lacks a user id
    /// * If a user id appears twice
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.team_name, "team_name")?;

        for (index, member) in self.members.iter().enumerate() {
            if member.user_id.trim().is_empty() {
                return Err(ValidationError::MissingMemberField {
                    index,
                    field: "user_id",
                });
            }
            if self.members[..index]
                .iter()
                .any(|m| m.user_id == member.user_id)
            {
                return Err(ValidationError::DuplicateMember(member.user_id.clone()));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetIsActiveRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub is_active: bool,
}

impl SetIsActiveRequest {
    /// # Errors
    ///
    /// * If the user id is empty
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.user_id, "user_id")
    }
}
