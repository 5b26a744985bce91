#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Reviewer assignment and pull request lifecycle for `ReviewFlow`.
//!
//! [`ReviewService`] is the single entry point. It picks reviewers when a pull
//! request is opened, swaps a reviewer out on request, merges pull requests and
//! cascades team deactivation into open review assignments. Every operation is
//! one atomic unit against the injected [`ReviewStore`](reviewflow_store::ReviewStore).

mod assignment;
mod cascade;
mod error;
mod lifecycle;
mod membership;
mod service;
mod stats;

pub use assignment::{Reassignment, pick_replacement, select_reviewers};
pub use cascade::DeactivationSummary;
pub use error::{Entity, ReviewError};
pub use reviewflow_review_models as models;
pub use service::{MAX_REVIEWERS, ReviewService};
