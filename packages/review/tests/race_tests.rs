mod helpers;

use helpers::Fixture;
use helpers::racing::Race;
use reviewflow_review::ReviewError;
use reviewflow_review::models::{CreatePrRequest, ReassignPrRequest};
use reviewflow_store::{MembershipStore, PrRepository, StoreError};

fn create(pull_request_id: &str, author_id: &str) -> CreatePrRequest {
    CreatePrRequest {
        pull_request_id: pull_request_id.to_string(),
        pull_request_name: "Add search".to_string(),
        author_id: author_id.to_string(),
    }
}

fn reassign(pull_request_id: &str, old_reviewer_id: &str) -> ReassignPrRequest {
    ReassignPrRequest {
        pull_request_id: pull_request_id.to_string(),
        old_reviewer_id: old_reviewer_id.to_string(),
    }
}

#[test_log::test(tokio::test)]
async fn test_create_losing_to_concurrent_create_is_already_exists() {
    let (fixture, racing) = Fixture::racing(1).await;
    racing.arm(Race::DuplicatePr);

    let err = fixture
        .service
        .create_pr(create("pr1", "alice"))
        .await
        .unwrap_err();

    assert!(
        matches!(&err, ReviewError::AlreadyExists { pull_request_id } if pull_request_id == "pr1"),
        "{err:?}"
    );
    let stored = fixture.store.find_pr("pr1").await.unwrap().unwrap();
    assert_eq!(stored.pull_request.pull_request_name, "competing");
    assert!(stored.reviewers.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_create_after_author_removed_is_author_not_found() {
    let (fixture, racing) = Fixture::racing(1).await;
    racing.arm(Race::AuthorVanished {
        user_id: "ghost".to_string(),
        team_name: "backend".to_string(),
    });

    let err = fixture
        .service
        .create_pr(create("pr1", "ghost"))
        .await
        .unwrap_err();

    assert!(
        matches!(&err, ReviewError::AuthorNotFound { author_id } if author_id == "ghost"),
        "{err:?}"
    );
    assert!(!fixture.store.pr_exists("pr1").await.unwrap());
}

#[test_log::test(tokio::test)]
async fn test_reassign_after_old_reviewer_replaced_is_not_assigned() {
    let (fixture, racing) = Fixture::racing(1).await;
    fixture.open_pr_with("pr1", "alice", &["bob", "carol"]).await;
    racing.arm(Race::OldReviewerReplaced {
        by: "erin".to_string(),
    });

    let err = fixture
        .service
        .reassign_pr(reassign("pr1", "bob"))
        .await
        .unwrap_err();

    assert!(
        matches!(
            &err,
            ReviewError::UserNotAssignedToPr { pull_request_id, user_id }
                if pull_request_id == "pr1" && user_id == "bob"
        ),
        "{err:?}"
    );
    assert_eq!(fixture.reviewers_of("pr1").await, vec!["carol", "erin"]);
}

#[test_log::test(tokio::test)]
async fn test_reassign_to_candidate_taken_concurrently_is_already_assigned() {
    let (fixture, racing) = Fixture::racing(1).await;
    fixture.open_pr_with("pr1", "alice", &["bob", "carol"]).await;
    // dave is the only candidate left, and carol's seat goes to him first.
    racing.arm(Race::ReplacementTaken {
        other: "carol".to_string(),
    });

    let err = fixture
        .service
        .reassign_pr(reassign("pr1", "bob"))
        .await
        .unwrap_err();

    assert!(
        matches!(
            &err,
            ReviewError::ReviewerAlreadyAssigned { pull_request_id, user_id }
                if pull_request_id == "pr1" && user_id == "dave"
        ),
        "{err:?}"
    );
    assert_eq!(fixture.reviewers_of("pr1").await, vec!["bob", "dave"]);
}

#[test_log::test(tokio::test)]
async fn test_failed_reviewer_delete_rolls_back_deactivation() {
    let (fixture, racing) = Fixture::racing(1).await;
    fixture.open_pr_with("pr1", "alice", &["bob", "carol"]).await;
    racing.arm(Race::CascadeDeleteFails);

    let err = fixture
        .service
        .mass_deactivate_team_users("backend")
        .await
        .unwrap_err();

    assert!(
        matches!(err, ReviewError::Store(StoreError::Unavailable(_))),
        "{err:?}"
    );
    for user in fixture.store.list_team_members("backend").await.unwrap() {
        assert!(user.is_active, "{} should still be active", user.user_id);
    }
    assert_eq!(fixture.reviewers_of("pr1").await, vec!["bob", "carol"]);
}

#[test_log::test(tokio::test)]
async fn test_cascade_succeeds_once_race_is_spent() {
    let (fixture, racing) = Fixture::racing(1).await;
    fixture.open_pr_with("pr1", "alice", &["bob", "carol"]).await;
    racing.arm(Race::CascadeDeleteFails);

    assert!(
        fixture
            .service
            .mass_deactivate_team_users("backend")
            .await
            .is_err()
    );
    let summary = fixture
        .service
        .mass_deactivate_team_users("backend")
        .await
        .unwrap();

    assert_eq!(summary.deactivated_users, 4);
    assert_eq!(summary.removed_reviewers, 2);
    assert!(fixture.reviewers_of("pr1").await.is_empty());
}
