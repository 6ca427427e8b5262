//! Poll domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use society_shared::types::{PollId, PollOptionId};

/// The parts of a poll needed to accept or reject a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSnapshot {
    /// Poll id.
    pub id: PollId,
    /// Admin-controlled active flag.
    pub is_active: bool,
    /// Voting closes at this instant.
    pub expires_at: DateTime<Utc>,
    /// Options belonging to the poll.
    pub option_ids: Vec<PollOptionId>,
}

impl PollSnapshot {
    /// True while votes are accepted.
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now < self.expires_at
    }
}

/// Vote count for one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionTally {
    /// Option id.
    pub option_id: PollOptionId,
    /// Option label.
    pub label: String,
    /// Votes received.
    pub votes: u64,
}
