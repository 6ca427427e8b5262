//! Payment confirmation repository.
//!
//! A confirmed gateway payment is stored and every row it settles is marked
//! paid in a single tenant transaction. Any failure rolls the whole
//! confirmation back.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use serde::Serialize;
use society_core::lifecycle::TransitionOutcome;
use society_core::payment::{GatewayPayment, PaymentError, PaymentTarget, validate_confirmation};
use society_shared::AppError;
use uuid::Uuid;

use super::dues::{DuesRepoError, mark_due_paid};
use super::is_unique_violation;
use super::maintenance::{MaintenanceError, mark_allocation_paid};
use super::penalty::{PenaltyRepoError, mark_penalty_paid};
use crate::entities::payments;
use crate::rls::SocietyScoped;

/// Error types for payment confirmation.
#[derive(Debug, thiserror::Error)]
pub enum PaymentRepoError {
    /// The gateway payment id was recorded before.
    #[error("Payment already recorded: {0}")]
    AlreadyRecorded(String),

    /// Confirmation failed validation.
    #[error(transparent)]
    Invalid(#[from] PaymentError),

    /// A due target failed.
    #[error(transparent)]
    Due(#[from] DuesRepoError),

    /// An allocation target failed.
    #[error(transparent)]
    Allocation(#[from] MaintenanceError),

    /// A penalty target failed.
    #[error(transparent)]
    Penalty(#[from] PenaltyRepoError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PaymentRepoError> for AppError {
    fn from(err: PaymentRepoError) -> Self {
        match err {
            PaymentRepoError::AlreadyRecorded(_) => Self::Conflict(err.to_string()),
            PaymentRepoError::Invalid(e) => e.into(),
            PaymentRepoError::Due(e) => e.into(),
            PaymentRepoError::Allocation(e) => e.into(),
            PaymentRepoError::Penalty(e) => e.into(),
            PaymentRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// What happened to one target of a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetOutcome {
    /// The settled row.
    pub target: PaymentTarget,
    /// True if the row had been paid before this confirmation.
    pub already_paid: bool,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a verified gateway payment and marks its targets paid.
    ///
    /// The signature must be checked before calling this.
    ///
    /// # Errors
    ///
    /// Returns `PaymentRepoError::AlreadyRecorded` for a replayed gateway
    /// payment id, or the target's error if any row is missing or refuses
    /// payment.
    pub async fn confirm(
        &self,
        society_id: Uuid,
        payment: GatewayPayment,
        targets: &[PaymentTarget],
        confirmed_by: Uuid,
    ) -> Result<(payments::Model, Vec<TargetOutcome>), PaymentRepoError> {
        validate_confirmation(&payment, targets)?;

        let rls = self.db.with_rls(society_id).await?;
        let txn = rls.transaction();
        let now = Utc::now();

        let gateway_payment_id = payment.payment_id.clone();
        let record = payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            society_id: Set(society_id),
            gateway_payment_id: Set(payment.payment_id),
            gateway_order_id: Set(payment.order_id),
            method: Set(payment.method),
            amount: Set(payment.amount),
            fee: Set(payment.fee),
            tax: Set(payment.tax),
            confirmed_by: Set(confirmed_by),
            created_at: Set(now.into()),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PaymentRepoError::AlreadyRecorded(gateway_payment_id.clone())
            } else {
                PaymentRepoError::Database(e)
            }
        })?;

        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            let payment_id = Some(record.id);
            let outcome: TransitionOutcome = match *target {
                PaymentTarget::Due(id) => {
                    mark_due_paid(txn, society_id, id.into_inner(), payment_id, now)
                        .await?
                        .1
                }
                PaymentTarget::Allocation(id) => {
                    mark_allocation_paid(txn, society_id, id.into_inner(), payment_id, now)
                        .await?
                        .1
                }
                PaymentTarget::Penalty(id) => {
                    mark_penalty_paid(txn, society_id, id.into_inner(), payment_id, now)
                        .await?
                        .1
                }
            };
            outcomes.push(TargetOutcome {
                target: *target,
                already_paid: outcome.was_already_applied(),
            });
        }

        rls.commit().await?;
        tracing::info!(
            society_id = %society_id,
            payment_id = %record.id,
            gateway_payment_id = %gateway_payment_id,
            target_count = outcomes.len(),
            "Payment confirmed"
        );
        Ok((record, outcomes))
    }
}
