use super::*;
use chrono::Duration;
use proptest::prelude::*;
use society_shared::types::{PollId, UserId};

fn open_poll(options: usize) -> PollSnapshot {
    PollSnapshot {
        id: PollId::new(),
        is_active: true,
        expires_at: Utc::now() + Duration::days(7),
        option_ids: (0..options).map(|_| PollOptionId::new()).collect(),
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

#[test]
fn test_validate_new_poll_ok() {
    let now = Utc::now();
    let result = validate_new_poll(
        "Repaint the lobby?",
        &labels(&[" Yes ", "No"]),
        now + Duration::days(3),
        now,
    )
    .unwrap();
    assert_eq!(result, vec!["Yes".to_string(), "No".to_string()]);
}

#[test]
fn test_validate_new_poll_rejects_single_option() {
    let now = Utc::now();
    assert_eq!(
        validate_new_poll("Q", &labels(&["Only"]), now + Duration::days(1), now),
        Err(VoteError::OptionCount {
            max: MAX_POLL_OPTIONS,
            actual: 1
        })
    );
}

#[test]
fn test_validate_new_poll_rejects_duplicates_and_blank() {
    let now = Utc::now();
    let later = now + Duration::days(1);
    assert_eq!(
        validate_new_poll("Q", &labels(&["Yes", "yes"]), later, now),
        Err(VoteError::InvalidOptionLabels)
    );
    assert_eq!(
        validate_new_poll("Q", &labels(&["Yes", " "]), later, now),
        Err(VoteError::InvalidOptionLabels)
    );
    assert_eq!(
        validate_new_poll("  ", &labels(&["Yes", "No"]), later, now),
        Err(VoteError::QuestionRequired)
    );
}

#[test]
fn test_validate_new_poll_rejects_past_expiry() {
    let now = Utc::now();
    assert_eq!(
        validate_new_poll("Q", &labels(&["Yes", "No"]), now, now),
        Err(VoteError::ExpiryInPast)
    );
}

#[test]
fn test_vote_outcomes() {
    let now = Utc::now();
    let poll = open_poll(2);
    let option = poll.option_ids[0];

    assert_eq!(validate_vote(Some(&poll), option, false, now), Ok(()));
    assert_eq!(
        validate_vote(None, option, false, now),
        Err(VoteError::PollNotFound)
    );
    assert_eq!(
        validate_vote(Some(&poll), PollOptionId::new(), false, now),
        Err(VoteError::InvalidOption)
    );
    assert_eq!(
        validate_vote(Some(&poll), option, true, now),
        Err(VoteError::AlreadyVoted)
    );

    let mut inactive = poll.clone();
    inactive.is_active = false;
    assert_eq!(
        validate_vote(Some(&inactive), option, false, now),
        Err(VoteError::PollClosed)
    );

    let after_expiry = poll.expires_at + Duration::seconds(1);
    assert_eq!(
        validate_vote(Some(&poll), option, false, after_expiry),
        Err(VoteError::PollClosed)
    );
}

#[test]
fn test_second_vote_rejected_total_stays_one() {
    let now = Utc::now();
    let poll = open_poll(2);
    let mut voters: HashSet<UserId> = HashSet::new();
    let mut votes = Vec::new();
    let user = UserId::new();

    for option in [poll.option_ids[0], poll.option_ids[1]] {
        let outcome = validate_vote(Some(&poll), option, voters.contains(&user), now);
        if outcome.is_ok() {
            voters.insert(user);
            votes.push(option);
        } else {
            assert_eq!(outcome, Err(VoteError::AlreadyVoted));
        }
    }

    let options: Vec<(PollOptionId, String)> = poll
        .option_ids
        .iter()
        .map(|id| (*id, id.to_string()))
        .collect();
    let total: u64 = tally(&options, &votes).iter().map(|t| t.votes).sum();
    assert_eq!(total, 1);
}

#[test]
fn test_tally_ignores_unknown_options() {
    let a = PollOptionId::new();
    let b = PollOptionId::new();
    let options = vec![(a, "A".to_string()), (b, "B".to_string())];
    let votes = vec![a, a, b, PollOptionId::new()];

    let result = tally(&options, &votes);
    assert_eq!(result[0].votes, 2);
    assert_eq!(result[1].votes, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// However many attempts each user makes, the vote count never
    /// exceeds the number of distinct voters.
    #[test]
    fn prop_votes_never_exceed_voters(attempts in prop::collection::vec((0usize..5, 0usize..3), 0..40)) {
        let now = Utc::now();
        let poll = open_poll(3);
        let users: Vec<UserId> = (0..5).map(|_| UserId::new()).collect();
        let mut voters: HashSet<UserId> = HashSet::new();
        let mut votes = Vec::new();

        for (user_idx, option_idx) in attempts {
            let user = users[user_idx];
            let option = poll.option_ids[option_idx];
            match validate_vote(Some(&poll), option, voters.contains(&user), now) {
                Ok(()) => {
                    voters.insert(user);
                    votes.push(option);
                }
                Err(err) => prop_assert_eq!(err, VoteError::AlreadyVoted),
            }
        }

        prop_assert_eq!(votes.len(), voters.len());
        let options: Vec<(PollOptionId, String)> =
            poll.option_ids.iter().map(|id| (*id, String::new())).collect();
        let counted: u64 = tally(&options, &votes).iter().map(|t| t.votes).sum();
        prop_assert_eq!(counted, voters.len() as u64);
    }
}
