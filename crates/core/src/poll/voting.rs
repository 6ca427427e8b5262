//! Poll validation and vote counting.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use society_shared::types::PollOptionId;

use super::error::VoteError;
use super::types::{OptionTally, PollSnapshot};

/// Maximum options per poll.
pub const MAX_POLL_OPTIONS: usize = 10;

/// Validates a new poll and returns its trimmed option labels.
///
/// # Errors
///
/// Returns a `VoteError` for a blank question, fewer than two or more than
/// [`MAX_POLL_OPTIONS`] options, blank or repeated labels, or an expiry that
/// is not after `now`.
pub fn validate_new_poll(
    question: &str,
    options: &[String],
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Vec<String>, VoteError> {
    if question.trim().is_empty() {
        return Err(VoteError::QuestionRequired);
    }
    if !(2..=MAX_POLL_OPTIONS).contains(&options.len()) {
        return Err(VoteError::OptionCount {
            max: MAX_POLL_OPTIONS,
            actual: options.len(),
        });
    }

    let labels: Vec<String> = options.iter().map(|o| o.trim().to_string()).collect();
    let mut seen = HashSet::with_capacity(labels.len());
    if labels
        .iter()
        .any(|label| label.is_empty() || !seen.insert(label.to_lowercase()))
    {
        return Err(VoteError::InvalidOptionLabels);
    }

    if expires_at <= now {
        return Err(VoteError::ExpiryInPast);
    }
    Ok(labels)
}

/// Decides whether a vote may be recorded.
///
/// # Errors
///
/// Checks run in order: poll missing, poll closed, option not in poll,
/// user already voted.
pub fn validate_vote(
    poll: Option<&PollSnapshot>,
    option_id: PollOptionId,
    already_voted: bool,
    now: DateTime<Utc>,
) -> Result<(), VoteError> {
    let poll = poll.ok_or(VoteError::PollNotFound)?;
    if !poll.is_open(now) {
        return Err(VoteError::PollClosed);
    }
    if !poll.option_ids.contains(&option_id) {
        return Err(VoteError::InvalidOption);
    }
    if already_voted {
        return Err(VoteError::AlreadyVoted);
    }
    Ok(())
}

/// Counts votes per option, keeping the options' order.
///
/// Votes for unknown options are ignored.
#[must_use]
pub fn tally(options: &[(PollOptionId, String)], votes: &[PollOptionId]) -> Vec<OptionTally> {
    let mut counts: HashMap<PollOptionId, u64> = HashMap::with_capacity(options.len());
    for vote in votes {
        *counts.entry(*vote).or_default() += 1;
    }
    options
        .iter()
        .map(|(option_id, label)| OptionTally {
            option_id: *option_id,
            label: label.clone(),
            votes: counts.get(option_id).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
#[path = "voting_tests.rs"]
mod tests;
