//! Poll error types.

use society_shared::AppError;
use thiserror::Error;

/// Errors raised when creating polls or casting votes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    /// Poll does not exist in this society.
    #[error("Poll not found")]
    PollNotFound,

    /// Poll is inactive or past its expiry.
    #[error("Poll is not active or has expired")]
    PollClosed,

    /// User has already voted in this poll.
    #[error("User has already voted in this poll")]
    AlreadyVoted,

    /// Option does not belong to this poll.
    #[error("Option does not belong to this poll")]
    InvalidOption,

    /// Question is blank.
    #[error("Poll question is required")]
    QuestionRequired,

    /// Fewer than two options, or more than the maximum.
    #[error("A poll needs between 2 and {max} options, got {actual}")]
    OptionCount {
        /// Maximum allowed.
        max: usize,
        /// Options supplied.
        actual: usize,
    },

    /// Two options share the same label, or a label is blank.
    #[error("Poll options must be distinct and non-empty")]
    InvalidOptionLabels,

    /// Expiry is not in the future.
    #[error("Poll expiry must be in the future")]
    ExpiryInPast,
}

impl From<VoteError> for AppError {
    fn from(err: VoteError) -> Self {
        match err {
            VoteError::PollNotFound | VoteError::InvalidOption => Self::NotFound(err.to_string()),
            VoteError::AlreadyVoted => Self::Conflict(err.to_string()),
            VoteError::PollClosed => Self::BusinessRule(err.to_string()),
            VoteError::QuestionRequired
            | VoteError::OptionCount { .. }
            | VoteError::InvalidOptionLabels
            | VoteError::ExpiryInPast => Self::Validation(err.to_string()),
        }
    }
}
