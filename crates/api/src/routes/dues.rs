//! Dues, pending maintenance and allocation routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use society_core::auth::SocietyRole;
use society_core::dues::GenerationSummary;
use society_core::lifecycle::TransitionOutcome;
use society_core::period::MonthYear;
use society_db::entities::{maintenance_allocations, monthly_maintenance_dues};
use society_db::repositories::{CreatePendingInput, DuesFilter};
use society_db::{DuesRepository, MaintenanceRepository, MemberRepository};
use society_shared::AppError;
use society_shared::types::PageResponse;
use tracing::info;
use uuid::Uuid;

use super::invalidate_dashboard;
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, require_role};
use crate::schemas::{self, DuesQuery, GenerateDuesInput, validate_input};

/// Creates the dues router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/societies/{society_id}/dues", get(list_dues))
        .route("/societies/{society_id}/dues/generate", post(generate_dues))
        .route("/societies/{society_id}/dues/{due_id}", get(get_due))
        .route("/societies/{society_id}/dues/{due_id}/pay", post(pay_due))
        .route(
            "/societies/{society_id}/dues/{due_id}/pending",
            post(create_pending),
        )
        .route(
            "/societies/{society_id}/pending/{pending_id}",
            get(get_pending),
        )
        .route(
            "/societies/{society_id}/allocations/{allocation_id}/pay",
            post(pay_allocation),
        )
}

#[derive(Debug, Serialize)]
struct GenerationResponse {
    month: MonthYear,
    #[serde(flatten)]
    summary: GenerationSummary,
    total_created: u64,
}

#[derive(Debug, Serialize)]
struct PaidDue {
    due: monthly_maintenance_dues::Model,
    outcome: TransitionOutcome,
}

#[derive(Debug, Serialize)]
struct PaidAllocation {
    allocation: maintenance_allocations::Model,
    outcome: TransitionOutcome,
}

/// POST /societies/{society_id}/dues/generate?month= - Create missing dues for a month.
///
/// Safe to call repeatedly; units already billed for the month are skipped.
async fn generate_dues(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Query(input): Query<GenerateDuesInput>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let month = input
        .month
        .unwrap_or_else(|| MonthYear::current_in(state.dues_timezone, Utc::now()));

    let summary = DuesRepository::new((*state.db).clone())
        .generate_for_month(Some(society_id), month)
        .await?;

    if summary.total() > 0 {
        invalidate_dashboard(&state, society_id);
    }
    info!(
        society_id = %society_id,
        month = %month,
        flats = summary.flats_created,
        housing_units = summary.housing_units_created,
        due_count = summary.total(),
        "Dues generated"
    );
    Ok(Json(GenerationResponse {
        month,
        summary,
        total_created: summary.total(),
    }))
}

/// GET /societies/{society_id}/dues - List a page of dues by month, paid flag or member.
///
/// Members only see dues billed to their own unit.
async fn list_dues(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Query(query): Query<DuesQuery>,
) -> ApiResult<Json<PageResponse<monthly_maintenance_dues::Model>>> {
    let role = require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    let page = query.page_request();
    let member_id = if role.can_manage() {
        query.member_id
    } else {
        let Some(member) = MemberRepository::new((*state.db).clone())
            .find_active_for_user(society_id, auth.user_id())
            .await?
        else {
            return Ok(Json(PageResponse::empty(page)));
        };
        Some(member.id)
    };

    let (dues, total) = DuesRepository::new((*state.db).clone())
        .list_page(
            society_id,
            DuesFilter {
                month: query.month,
                paid: query.paid,
                member_id,
            },
            page,
        )
        .await?;

    Ok(Json(PageResponse::new(dues, page, total)))
}

/// GET /societies/{society_id}/dues/{due_id} - Get one due.
async fn get_due(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, due_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    let role = require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    let due = visible_due(&state, role, society_id, auth.user_id(), due_id).await?;
    Ok(Json(due))
}

/// Loads a due, hiding it from members it is not billed to.
async fn visible_due(
    state: &AppState,
    role: SocietyRole,
    society_id: Uuid,
    user_id: Uuid,
    due_id: Uuid,
) -> ApiResult<monthly_maintenance_dues::Model> {
    let not_found = || AppError::NotFound(format!("Due {due_id} not found"));
    let due = DuesRepository::new((*state.db).clone())
        .find(society_id, due_id)
        .await?
        .ok_or_else(not_found)?;

    if role.can_manage() {
        return Ok(due);
    }
    let member_id = MemberRepository::new((*state.db).clone())
        .find_active_for_user(society_id, user_id)
        .await?
        .map(|member| member.id);
    if billed_to(&due, member_id) {
        Ok(due)
    } else {
        Err(not_found().into())
    }
}

fn billed_to(due: &monthly_maintenance_dues::Model, member_id: Option<Uuid>) -> bool {
    member_id.is_some_and(|id| due.member_ids.contains(&id))
}

/// POST /societies/{society_id}/dues/{due_id}/pay - Record an offline payment.
async fn pay_due(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, due_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let (due, outcome) = DuesRepository::new((*state.db).clone())
        .mark_paid(society_id, due_id)
        .await?;

    if outcome == TransitionOutcome::Applied {
        invalidate_dashboard(&state, society_id);
    }
    Ok(Json(PaidDue { due, outcome }))
}

/// POST /societies/{society_id}/dues/{due_id}/pending - Spread arrears over months.
async fn create_pending(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, due_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<schemas::CreatePendingInput>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let created = MaintenanceRepository::new((*state.db).clone())
        .create_pending(
            society_id,
            CreatePendingInput {
                due_id,
                amount: payload.amount,
                mode: payload.mode,
                start_month: payload.start_month,
                manual: payload.allocations,
                created_by: auth.user_id(),
            },
        )
        .await?;

    info!(
        society_id = %society_id,
        due_id = %due_id,
        pending_id = %created.pending.id,
        mode = payload.mode.as_str(),
        allocation_count = created.allocations.len(),
        "Pending maintenance allocated"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /societies/{society_id}/pending/{pending_id} - Get a pending record with its allocations.
async fn get_pending(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, pending_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    let role = require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    let not_found = || AppError::NotFound(format!("Pending maintenance {pending_id} not found"));
    let pending = MaintenanceRepository::new((*state.db).clone())
        .find_pending(society_id, pending_id)
        .await?
        .ok_or_else(not_found)?;

    visible_due(&state, role, society_id, auth.user_id(), pending.pending.due_id)
        .await
        .map_err(|err| match err.inner() {
            AppError::NotFound(_) => not_found().into(),
            _ => err,
        })?;
    Ok(Json(pending))
}

/// POST /societies/{society_id}/allocations/{allocation_id}/pay - Mark one month paid.
async fn pay_allocation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, allocation_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let (allocation, outcome) = MaintenanceRepository::new((*state.db).clone())
        .mark_allocation_paid(society_id, allocation_id)
        .await?;

    Ok(Json(PaidAllocation {
        allocation,
        outcome,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn due_for(member_ids: Vec<Uuid>) -> monthly_maintenance_dues::Model {
        monthly_maintenance_dues::Model {
            id: Uuid::now_v7(),
            society_id: Uuid::now_v7(),
            building_id: Some(Uuid::now_v7()),
            flat_id: Some(Uuid::now_v7()),
            housing_id: None,
            member_ids,
            month_year: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            maintenance_amount: dec!(10000),
            maintenance_paid: false,
            maintenance_paid_at: None,
            payment_id: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_member_sees_only_dues_billed_to_them() {
        let resident = Uuid::now_v7();
        let neighbour = Uuid::now_v7();
        let due = due_for(vec![resident]);

        assert!(billed_to(&due, Some(resident)));
        assert!(!billed_to(&due, Some(neighbour)));
        assert!(!billed_to(&due, None));
    }

    #[test]
    fn test_shared_unit_due_visible_to_every_occupant() {
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();
        let due = due_for(vec![first, second]);

        assert!(billed_to(&due, Some(first)));
        assert!(billed_to(&due, Some(second)));
    }
}
