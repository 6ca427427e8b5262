//! Integration tests for poll voting.
//!
//! Requires a running `PostgreSQL` database with migrations applied.

mod common;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use society_core::poll::VoteError;
use society_db::PollRepository;
use society_db::repositories::{CreatePollInput, PollRepoError};

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_second_vote_is_rejected() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(0)).await;

    let repo = PollRepository::new(db.clone());
    let (poll, options) = repo
        .create(
            society_id,
            CreatePollInput {
                question: "Repaint the lobby?".to_string(),
                description: None,
                options: vec!["Yes".to_string(), "No".to_string()],
                expires_at: Utc::now() + Duration::days(7),
                created_by: admin,
            },
        )
        .await
        .unwrap();

    repo.vote(society_id, poll.id, options[0].id, admin)
        .await
        .unwrap();
    let err = repo
        .vote(society_id, poll.id, options[1].id, admin)
        .await
        .unwrap_err();
    assert!(matches!(err, PollRepoError::Vote(VoteError::AlreadyVoted)));

    let tally = repo.get_with_tally(society_id, poll.id).await.unwrap();
    assert_eq!(tally.total_votes, 1);
    assert_eq!(tally.tally[0].votes, 1);
    assert_eq!(tally.tally[1].votes, 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_vote_on_closed_poll() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(0)).await;

    let repo = PollRepository::new(db.clone());
    let (poll, options) = repo
        .create(
            society_id,
            CreatePollInput {
                question: "Install solar panels?".to_string(),
                description: Some("Quote attached on the notice board".to_string()),
                options: vec!["Yes".to_string(), "No".to_string()],
                expires_at: Utc::now() + Duration::days(1),
                created_by: admin,
            },
        )
        .await
        .unwrap();
    repo.close(society_id, poll.id).await.unwrap();

    let err = repo
        .vote(society_id, poll.id, options[0].id, admin)
        .await
        .unwrap_err();
    assert!(matches!(err, PollRepoError::Vote(VoteError::PollClosed)));
}
