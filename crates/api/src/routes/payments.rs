//! Gateway payment confirmation.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde::Serialize;
use society_core::auth::SocietyRole;
use society_core::payment::{GatewayPayment, verify_signature};
use society_db::PaymentRepository;
use society_db::entities::payments;
use society_db::repositories::TargetOutcome;
use tracing::{info, warn};

use super::invalidate_dashboard;
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, require_role};
use crate::schemas::{ConfirmPaymentInput, validate_input};

/// Creates the payments router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payments/confirm", post(confirm_payment))
}

#[derive(Debug, Serialize)]
struct ConfirmationResponse {
    payment: payments::Model,
    targets: Vec<TargetOutcome>,
}

/// POST /payments/confirm - Verify a gateway signature and mark the targets paid.
///
/// The signature is checked before anything is written. Targets that were
/// already paid are reported, not rejected.
async fn confirm_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ConfirmPaymentInput>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;
    let society_id = payload.society_id;
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;

    if let Err(err) = verify_signature(
        &state.payment.webhook_secret,
        &payload.order_id,
        &payload.payment_id,
        &payload.signature,
    ) {
        warn!(
            society_id = %society_id,
            order_id = %payload.order_id,
            payment_id = %payload.payment_id,
            error = %err,
            "Payment signature rejected"
        );
        return Err(err.into());
    }

    let (payment, targets) = PaymentRepository::new((*state.db).clone())
        .confirm(
            society_id,
            GatewayPayment {
                payment_id: payload.payment_id,
                order_id: payload.order_id,
                method: payload.method,
                amount: payload.amount,
                fee: payload.fee,
                tax: payload.tax,
            },
            &payload.targets,
            auth.user_id(),
        )
        .await?;

    invalidate_dashboard(&state, society_id);
    info!(
        society_id = %society_id,
        payment_id = %payment.id,
        target_count = targets.len(),
        "Payment confirmed"
    );
    Ok(Json(ConfirmationResponse { payment, targets }))
}
