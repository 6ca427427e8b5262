//! Payment confirmation types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use society_shared::AppError;
use society_shared::types::{AllocationId, DueId, PenaltyId};
use thiserror::Error;

/// Errors raised while confirming a gateway payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// No webhook secret is configured.
    #[error("Payment gateway secret is not configured")]
    MissingSecret,

    /// Signature does not match the order and payment ids.
    #[error("Payment signature verification failed")]
    InvalidSignature,

    /// Confirmation names no rows to mark paid.
    #[error("At least one payment target is required")]
    NoTargets,

    /// The same row is listed twice.
    #[error("Payment targets must be distinct")]
    DuplicateTarget,

    /// Amount, fee or tax is negative or fractional.
    #[error("Payment amounts must be non-negative whole amounts")]
    InvalidAmount,
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::MissingSecret => Self::Internal(err.to_string()),
            PaymentError::InvalidSignature => Self::Unauthorized(err.to_string()),
            PaymentError::NoTargets
            | PaymentError::DuplicateTarget
            | PaymentError::InvalidAmount => Self::Validation(err.to_string()),
        }
    }
}

/// A row a payment settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum PaymentTarget {
    /// A monthly due paid in full.
    Due(DueId),
    /// One month of a pending maintenance allocation.
    Allocation(AllocationId),
    /// A penalty.
    Penalty(PenaltyId),
}

/// Gateway metadata stored alongside the rows a payment settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPayment {
    /// Gateway payment id.
    pub payment_id: String,
    /// Gateway order id.
    pub order_id: String,
    /// Payment method reported by the gateway (card, upi, ...).
    pub method: Option<String>,
    /// Amount captured in minor units.
    pub amount: Decimal,
    /// Gateway fee in minor units.
    #[serde(default)]
    pub fee: Decimal,
    /// Tax on the fee in minor units.
    #[serde(default)]
    pub tax: Decimal,
}

/// Checks a confirmation's targets and amounts before any write.
///
/// # Errors
///
/// Returns `PaymentError::NoTargets`, `PaymentError::DuplicateTarget` or
/// `PaymentError::InvalidAmount`.
pub fn validate_confirmation(
    payment: &GatewayPayment,
    targets: &[PaymentTarget],
) -> Result<(), PaymentError> {
    if targets.is_empty() {
        return Err(PaymentError::NoTargets);
    }
    let mut seen = std::collections::HashSet::with_capacity(targets.len());
    if !targets.iter().all(|t| seen.insert(*t)) {
        return Err(PaymentError::DuplicateTarget);
    }
    let non_negative_whole = |d: Decimal| d >= Decimal::ZERO && d.fract().is_zero();
    if ![payment.amount, payment.fee, payment.tax]
        .into_iter()
        .all(non_negative_whole)
    {
        return Err(PaymentError::InvalidAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payment(amount: Decimal) -> GatewayPayment {
        GatewayPayment {
            payment_id: "pay_1".to_string(),
            order_id: "order_1".to_string(),
            method: Some("upi".to_string()),
            amount,
            fee: dec!(20),
            tax: dec!(4),
        }
    }

    #[test]
    fn test_validate_confirmation() {
        let due = PaymentTarget::Due(DueId::new());
        assert!(validate_confirmation(&payment(dec!(2500)), &[due]).is_ok());
        assert_eq!(
            validate_confirmation(&payment(dec!(2500)), &[]),
            Err(PaymentError::NoTargets)
        );
        assert_eq!(
            validate_confirmation(&payment(dec!(2500)), &[due, due]),
            Err(PaymentError::DuplicateTarget)
        );
        assert_eq!(
            validate_confirmation(&payment(dec!(-1)), &[due]),
            Err(PaymentError::InvalidAmount)
        );
    }

    #[test]
    fn test_target_serde_shape() {
        let id = PenaltyId::new();
        let json = serde_json::to_value(PaymentTarget::Penalty(id)).unwrap();
        assert_eq!(json["type"], "penalty");
        assert_eq!(json["id"], id.to_string());
    }

    #[test]
    fn test_error_mapping() {
        let err: AppError = PaymentError::InvalidSignature.into();
        assert_eq!(err.status_code(), 401);
        let err: AppError = PaymentError::NoTargets.into();
        assert_eq!(err.status_code(), 400);
    }
}
