//! Expense and income routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use society_core::auth::SocietyRole;
use society_core::ledger::{LedgerEntryDraft, LedgerKind};
use society_db::LedgerRepository;
use society_db::entities::ledger_entries;
use society_db::repositories::LedgerFilter;
use tracing::info;
use uuid::Uuid;

use super::invalidate_dashboard;
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, require_role};
use crate::schemas::{CreateLedgerEntryInput, LedgerQuery, validate_input};

/// Creates the ledger router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/societies/{society_id}/expenses",
            get(list_expenses).post(create_expense),
        )
        .route(
            "/societies/{society_id}/incomes",
            get(list_incomes).post(create_income),
        )
}

async fn create_entry(
    state: &AppState,
    auth: &AuthUser,
    society_id: Uuid,
    kind: LedgerKind,
    payload: CreateLedgerEntryInput,
) -> ApiResult<(StatusCode, Json<ledger_entries::Model>)> {
    validate_input(&payload)?;
    require_role(state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let draft = LedgerEntryDraft::new(
        kind,
        &payload.entry_type,
        payload.reason.as_deref(),
        payload.amount,
        payload.month,
        payload.year,
    )?;
    let entry = LedgerRepository::new((*state.db).clone())
        .create(society_id, draft, auth.user_id())
        .await?;

    invalidate_dashboard(state, society_id);
    info!(society_id = %society_id, entry_id = %entry.id, kind = %kind, amount = %entry.amount, "Ledger entry recorded");
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn list_entries(
    state: &AppState,
    auth: &AuthUser,
    society_id: Uuid,
    kind: LedgerKind,
    query: LedgerQuery,
) -> ApiResult<Json<Vec<ledger_entries::Model>>> {
    require_role(state, society_id, auth.user_id(), SocietyRole::Member).await?;
    let entries = LedgerRepository::new((*state.db).clone())
        .list(
            society_id,
            kind,
            LedgerFilter {
                month: query.month,
                year: query.year,
            },
        )
        .await?;

    Ok(Json(entries))
}

/// POST /societies/{society_id}/expenses - Record an expense.
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<CreateLedgerEntryInput>,
) -> ApiResult<impl IntoResponse> {
    create_entry(&state, &auth, society_id, LedgerKind::Expense, payload).await
}

/// GET /societies/{society_id}/expenses - List expenses, optionally by month and year.
async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Query(query): Query<LedgerQuery>,
) -> ApiResult<impl IntoResponse> {
    list_entries(&state, &auth, society_id, LedgerKind::Expense, query).await
}

/// POST /societies/{society_id}/incomes - Record an income.
async fn create_income(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<CreateLedgerEntryInput>,
) -> ApiResult<impl IntoResponse> {
    create_entry(&state, &auth, society_id, LedgerKind::Income, payload).await
}

/// GET /societies/{society_id}/incomes - List incomes, optionally by month and year.
async fn list_incomes(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Query(query): Query<LedgerQuery>,
) -> ApiResult<impl IntoResponse> {
    list_entries(&state, &auth, society_id, LedgerKind::Income, query).await
}
