use strum::Display;

/// The logical relations a store persists.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Relation {
    Teams,
    Users,
    PullRequests,
    PullRequestReviewers,
}

/// Errors returned by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A primary key or unique constraint was violated.
    #[error("Duplicate key {key} in {relation}")]
    UniqueViolation { relation: Relation, key: String },

    /// A row references a parent row that does not exist.
    #[error("Row {key} in {relation} references a missing row")]
    ForeignKeyViolation { relation: Relation, key: String },

    /// An update or delete targeted a row that does not exist.
    #[error("No row {key} in {relation}")]
    RowNotFound { relation: Relation, key: String },

    /// The backing store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    #[must_use]
    pub fn unique(relation: Relation, key: impl Into<String>) -> Self {
        Self::UniqueViolation {
            relation,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn foreign_key(relation: Relation, key: impl Into<String>) -> Self {
        Self::ForeignKeyViolation {
            relation,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn not_found(relation: Relation, key: impl Into<String>) -> Self {
        Self::RowNotFound {
            relation,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn is_unique_violation_on(&self, target: Relation) -> bool {
        matches!(self, Self::UniqueViolation { relation, .. } if *relation == target)
    }

    #[must_use]
    pub fn is_foreign_key_violation_on(&self, target: Relation) -> bool {
        matches!(self, Self::ForeignKeyViolation { relation, .. } if *relation == target)
    }

    #[must_use]
    pub fn is_row_not_found_on(&self, target: Relation) -> bool {
        matches!(self, Self::RowNotFound { relation, .. } if *relation == target)
    }
}
