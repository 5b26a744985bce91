#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Domain models for `ReviewFlow`.
//!
//! Rows as the store persists them, the typed request payloads accepted by the
//! review engine, and the response shapes returned over HTTP.

pub mod pr;
pub mod request;
pub mod response;
pub mod stats;
pub mod team;

pub use pr::{PrStatus, PullRequest, PullRequestDetails, PullRequestReviewer};
pub use request::{
    AddTeamRequest, CreatePrRequest, MergePrRequest, ReassignPrRequest, SetIsActiveRequest,
    ValidationError, require,
};
pub use response::{
    AddTeamResponse, CreatePrResponse, DeactivateTeamResponse, MergePrResponse, PullRequestDto,
    PullRequestShort, ReassignPrResponse, SetIsActiveResponse, UserReview,
};
pub use stats::{TeamStats, UserStats};
pub use team::{Team, TeamMember, User};
