//! Polls and voting.

mod error;
mod types;
mod voting;

pub use error::VoteError;
pub use types::{OptionTally, PollSnapshot};
pub use voting::{MAX_POLL_OPTIONS, tally, validate_new_poll, validate_vote};
