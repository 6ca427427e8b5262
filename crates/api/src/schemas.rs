//! Request payloads.
//!
//! Every payload derives `Validate` for shape checks; domain rules (whole
//! amounts, allocation sums, vote eligibility) are enforced by the core
//! crate after validation passes. Field names mirror the JSON payloads.

#![allow(missing_docs)]

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use society_core::allocation::{AllocationMode, PlannedAllocation};
use society_core::auth::SocietyRole;
use society_core::dues::{DuesError, UnitRef};
use society_core::payment::PaymentTarget;
use society_core::period::MonthYear;
use society_db::entities::sea_orm_active_enums::SocietyType;
use society_shared::types::{BuildingId, FlatId, HousingUnitId, PageRequest};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiResult;

/// Runs `validator` checks on a payload.
///
/// # Errors
///
/// Returns a validation error listing the failing fields.
pub fn validate_input<T: Validate>(input: &T) -> ApiResult<()> {
    input.validate().map_err(Into::into)
}

/// Nullable unit columns as they arrive in a payload.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UnitInput {
    /// Building of a flat.
    pub building_id: Option<Uuid>,
    /// Flat.
    pub flat_id: Option<Uuid>,
    /// Housing unit.
    pub housing_id: Option<Uuid>,
}

impl UnitInput {
    /// Resolves the columns into exactly one unit.
    ///
    /// # Errors
    ///
    /// Returns a `DuesError` unless exactly one unit is named.
    pub fn to_unit(self) -> Result<UnitRef, DuesError> {
        UnitRef::from_parts(
            self.building_id.map(BuildingId::from_uuid),
            self.flat_id.map(FlatId::from_uuid),
            self.housing_id.map(HousingUnitId::from_uuid),
        )
    }
}

/// Create a society; the caller becomes its super admin.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSocietyInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub society_type: SocietyType,
    #[validate(length(min = 1, max = 500))]
    pub address_line: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 4, max = 12))]
    pub pincode: String,
    #[serde(default)]
    pub opening_balance: Decimal,
}

/// Partial society update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSocietyInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address_line: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub state: Option<String>,
    #[validate(length(min = 4, max = 12))]
    pub pincode: Option<String>,
    pub opening_balance: Option<Decimal>,
}

/// Grant or change a user's role.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRoleInput {
    pub user_id: Uuid,
    pub role: SocietyRole,
}

/// Create a building.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBuildingInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1, max = 300))]
    pub total_floors: i32,
}

/// Create a flat in a building.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFlatInput {
    pub building_id: Uuid,
    #[validate(length(min = 1, max = 20))]
    pub flat_number: String,
    #[validate(range(min = 0, max = 300))]
    pub floor_number: i32,
    #[validate(range(min = 1))]
    pub square_foot: i32,
    pub current_maintenance: Decimal,
}

/// Create a housing unit.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateHousingUnitInput {
    #[validate(length(min = 1, max = 20))]
    pub unit_number: String,
    #[validate(length(min = 1, max = 50))]
    pub unit_type: String,
    #[validate(range(min = 1))]
    pub square_foot: i32,
    pub current_maintenance: Decimal,
}

/// Change a unit's monthly maintenance rate.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRateInput {
    pub current_maintenance: Decimal,
}

/// Assign a user to a flat or housing unit.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignMemberInput {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub unit: UnitInput,
    pub move_in_date: NaiveDate,
}

/// Trigger dues generation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateDuesInput {
    /// Defaults to the current month in the configured timezone.
    pub month: Option<MonthYear>,
}

/// Dues list filters and page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuesQuery {
    pub month: Option<MonthYear>,
    pub paid: Option<bool>,
    pub member_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl DuesQuery {
    /// Requested page, clamped to valid bounds.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// Distribute a pending amount against a due.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePendingInput {
    pub amount: Decimal,
    pub mode: AllocationMode,
    pub start_month: Option<MonthYear>,
    #[validate(length(min = 1, max = 12))]
    pub allocations: Option<Vec<PlannedAllocation>>,
}

/// Charge a penalty.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePenaltyInput {
    #[serde(flatten)]
    pub unit: UnitInput,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Penalty list options.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PenaltyQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

/// Record an expense or income.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLedgerEntryInput {
    #[validate(length(min = 1, max = 100))]
    pub entry_type: String,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
    pub amount: Decimal,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    pub year: i32,
}

/// Ledger list filters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LedgerQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Create a poll.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePollInput {
    #[validate(length(min = 1, max = 500))]
    pub question: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 2, max = 10))]
    pub options: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

/// Cast a vote.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteInput {
    pub option_id: Uuid,
}

/// Publish a notice.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNoticeInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Gateway-signed payment confirmation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmPaymentInput {
    pub society_id: Uuid,
    #[validate(length(min = 1, max = 128))]
    pub order_id: String,
    #[validate(length(min = 1, max = 128))]
    pub payment_id: String,
    #[validate(length(equal = 64))]
    pub signature: String,
    #[validate(length(max = 50))]
    pub method: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub fee: Decimal,
    #[serde(default)]
    pub tax: Decimal,
    #[validate(length(min = 1))]
    pub targets: Vec<PaymentTarget>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_input_requires_exactly_one_unit() {
        let flat = UnitInput {
            building_id: Some(Uuid::now_v7()),
            flat_id: Some(Uuid::now_v7()),
            housing_id: None,
        };
        assert!(matches!(flat.to_unit(), Ok(UnitRef::Flat { .. })));

        let both = UnitInput {
            housing_id: Some(Uuid::now_v7()),
            ..flat
        };
        assert_eq!(both.to_unit(), Err(DuesError::AmbiguousUnit));
        assert_eq!(UnitInput::default().to_unit(), Err(DuesError::AmbiguousUnit));
    }

    #[test]
    fn test_poll_option_count_validation() {
        let input = CreatePollInput {
            question: "Paint the gate?".to_string(),
            description: None,
            options: vec!["Yes".to_string()],
            expires_at: Utc::now(),
        };
        assert!(validate_input(&input).is_err());
    }

    #[test]
    fn test_pending_input_deserializes_manual_split() {
        let input: CreatePendingInput = serde_json::from_value(serde_json::json!({
            "amount": "9000",
            "mode": "quarterly",
            "allocations": [
                {"month": "2024-01-01", "amount": "3000"},
                {"month": "2024-02-01", "amount": "3000"},
                {"month": "2024-03-01", "amount": "3000"}
            ]
        }))
        .unwrap();
        assert_eq!(input.mode, AllocationMode::Quarterly);
        assert_eq!(input.amount, dec!(9000));
        assert_eq!(input.allocations.map(|a| a.len()), Some(3));
    }

    #[test]
    fn test_dues_query_page_is_clamped() {
        let query = DuesQuery {
            page: Some(0),
            per_page: Some(1000),
            ..DuesQuery::default()
        };
        let page = query.page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, PageRequest::MAX_PER_PAGE);
        assert_eq!(
            DuesQuery::default().page_request().per_page,
            PageRequest::DEFAULT_PER_PAGE
        );
    }

    #[test]
    fn test_payment_targets_deserialize() {
        let due = Uuid::now_v7();
        let targets: Vec<PaymentTarget> =
            serde_json::from_value(serde_json::json!([{"type": "due", "id": due}])).unwrap();
        assert_eq!(targets.len(), 1);
    }
}
