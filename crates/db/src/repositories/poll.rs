//! Poll repository: polls, options and votes.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use society_core::poll::{OptionTally, PollSnapshot, VoteError, tally, validate_vote};
use society_shared::AppError;
use society_shared::types::{PollId, PollOptionId};
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::{poll_options, poll_votes, polls};
use crate::rls::SocietyScoped;

/// Error types for poll operations.
#[derive(Debug, thiserror::Error)]
pub enum PollRepoError {
    /// Poll not found in the society.
    #[error("Poll not found: {0}")]
    NotFound(Uuid),

    /// Vote rejected.
    #[error(transparent)]
    Vote(#[from] VoteError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PollRepoError> for AppError {
    fn from(err: PollRepoError) -> Self {
        match err {
            PollRepoError::NotFound(_) => Self::NotFound(err.to_string()),
            PollRepoError::Vote(e) => e.into(),
            PollRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a poll. Labels are expected to be validated already.
#[derive(Debug, Clone)]
pub struct CreatePollInput {
    /// Question text.
    pub question: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Option labels in display order.
    pub options: Vec<String>,
    /// Voting closes at this instant.
    pub expires_at: DateTime<Utc>,
    /// Acting user.
    pub created_by: Uuid,
}

/// A poll with its options and current counts.
#[derive(Debug, Clone, Serialize)]
pub struct PollWithTally {
    /// The poll.
    pub poll: polls::Model,
    /// Votes per option in display order.
    pub tally: Vec<OptionTally>,
    /// Total votes cast.
    pub total_votes: u64,
}

/// Poll repository.
#[derive(Debug, Clone)]
pub struct PollRepository {
    db: DatabaseConnection,
}

impl PollRepository {
    /// Creates a new poll repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a poll with its options in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if an insert fails.
    pub async fn create(
        &self,
        society_id: Uuid,
        input: CreatePollInput,
    ) -> Result<(polls::Model, Vec<poll_options::Model>), DbErr> {
        let rls = self.db.with_rls(society_id).await?;
        let txn = rls.transaction();

        let poll_id = Uuid::now_v7();
        let poll = polls::ActiveModel {
            id: Set(poll_id),
            society_id: Set(society_id),
            question: Set(input.question),
            description: Set(input.description),
            is_active: Set(true),
            expires_at: Set(input.expires_at.into()),
            created_by: Set(input.created_by),
            created_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await?;

        let mut options = Vec::with_capacity(input.options.len());
        for (position, label) in (0_i32..).zip(input.options) {
            let option = poll_options::ActiveModel {
                id: Set(Uuid::now_v7()),
                society_id: Set(society_id),
                poll_id: Set(poll_id),
                label: Set(label),
                position: Set(position),
            }
            .insert(txn)
            .await?;
            options.push(option);
        }

        rls.commit().await?;
        tracing::info!(society_id = %society_id, poll_id = %poll_id, "Poll created");
        Ok((poll, options))
    }

    /// Lists a society's polls, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, society_id: Uuid) -> Result<Vec<polls::Model>, DbErr> {
        polls::Entity::find()
            .filter(polls::Column::SocietyId.eq(society_id))
            .order_by_desc(polls::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Gets a poll with per-option counts.
    ///
    /// # Errors
    ///
    /// Returns `PollRepoError::NotFound` for an unknown poll.
    pub async fn get_with_tally(
        &self,
        society_id: Uuid,
        poll_id: Uuid,
    ) -> Result<PollWithTally, PollRepoError> {
        let poll = polls::Entity::find_by_id(poll_id)
            .filter(polls::Column::SocietyId.eq(society_id))
            .one(&self.db)
            .await?
            .ok_or(PollRepoError::NotFound(poll_id))?;

        let (options, votes) = tokio::try_join!(
            load_options(&self.db, poll_id),
            poll_votes::Entity::find()
                .filter(poll_votes::Column::PollId.eq(poll_id))
                .all(&self.db),
        )?;

        let labels: Vec<(PollOptionId, String)> = options
            .into_iter()
            .map(|o| (PollOptionId::from_uuid(o.id), o.label))
            .collect();
        let cast: Vec<PollOptionId> = votes
            .iter()
            .map(|v| PollOptionId::from_uuid(v.option_id))
            .collect();

        Ok(PollWithTally {
            tally: tally(&labels, &cast),
            total_votes: cast.len() as u64,
            poll,
        })
    }

    /// Records a vote.
    ///
    /// Runs in one transaction; the `(poll_id, user_id)` unique constraint
    /// turns a concurrent second vote into `VoteError::AlreadyVoted`.
    ///
    /// # Errors
    ///
    /// Returns a `VoteError` for a missing, closed or foreign-option poll or
    /// a repeated vote.
    pub async fn vote(
        &self,
        society_id: Uuid,
        poll_id: Uuid,
        option_id: Uuid,
        user_id: Uuid,
    ) -> Result<poll_votes::Model, PollRepoError> {
        let rls = self.db.with_rls(society_id).await?;
        let txn = rls.transaction();

        let snapshot = load_snapshot(txn, society_id, poll_id).await?;
        let already_voted = poll_votes::Entity::find()
            .filter(poll_votes::Column::PollId.eq(poll_id))
            .filter(poll_votes::Column::UserId.eq(user_id))
            .count(txn)
            .await?
            > 0;
        validate_vote(
            snapshot.as_ref(),
            PollOptionId::from_uuid(option_id),
            already_voted,
            Utc::now(),
        )?;

        let vote = poll_votes::ActiveModel {
            id: Set(Uuid::now_v7()),
            society_id: Set(society_id),
            poll_id: Set(poll_id),
            option_id: Set(option_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PollRepoError::Vote(VoteError::AlreadyVoted)
            } else {
                PollRepoError::Database(e)
            }
        })?;

        rls.commit().await?;
        tracing::info!(society_id = %society_id, poll_id = %poll_id, "Vote recorded");
        Ok(vote)
    }

    /// Closes a poll to further votes.
    ///
    /// # Errors
    ///
    /// Returns `PollRepoError::NotFound` for an unknown poll.
    pub async fn close(
        &self,
        society_id: Uuid,
        poll_id: Uuid,
    ) -> Result<polls::Model, PollRepoError> {
        let poll = polls::Entity::find_by_id(poll_id)
            .filter(polls::Column::SocietyId.eq(society_id))
            .one(&self.db)
            .await?
            .ok_or(PollRepoError::NotFound(poll_id))?;

        let mut active: polls::ActiveModel = poll.into();
        active.is_active = Set(false);
        Ok(active.update(&self.db).await?)
    }
}

/// Options of a poll in display order.
async fn load_options<C: ConnectionTrait>(
    conn: &C,
    poll_id: Uuid,
) -> Result<Vec<poll_options::Model>, DbErr> {
    poll_options::Entity::find()
        .filter(poll_options::Column::PollId.eq(poll_id))
        .order_by_asc(poll_options::Column::Position)
        .all(conn)
        .await
}

/// The poll as the vote rules see it, or `None` outside this society.
async fn load_snapshot<C: ConnectionTrait>(
    conn: &C,
    society_id: Uuid,
    poll_id: Uuid,
) -> Result<Option<PollSnapshot>, DbErr> {
    let Some(poll) = polls::Entity::find_by_id(poll_id)
        .filter(polls::Column::SocietyId.eq(society_id))
        .one(conn)
        .await?
    else {
        return Ok(None);
    };

    let option_ids = load_options(conn, poll_id)
        .await?
        .into_iter()
        .map(|o| PollOptionId::from_uuid(o.id))
        .collect();

    Ok(Some(PollSnapshot {
        id: PollId::from_uuid(poll.id),
        is_active: poll.is_active,
        expires_at: poll.expires_at.with_timezone(&Utc),
        option_ids,
    }))
}
