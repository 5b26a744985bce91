#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Storage for `ReviewFlow`.
//!
//! The review engine only talks to the traits in this crate. Every method is a
//! single atomic unit against the store, and multi-step units go through a
//! [`StoreTransaction`]. Uniqueness of `pull_request_id` and of
//! `(pull_request_id, user_id)` is enforced here, not by the callers.

mod error;
mod memory;
mod store;

pub use error::{Relation, StoreError};
pub use memory::InMemoryStore;
pub use reviewflow_review_models as models;
pub use store::{
    MembershipStore, PrRepository, ReviewStore, StatsSource, StoreTransaction, TransactionalStore,
};
