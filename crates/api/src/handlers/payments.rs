//! Handlers for the payment gateway webhook and the admin payment ledger.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use sweetbox_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sweetbox_core::payment::{STATUS_CAPTURED, STATUS_FAILED};
use sweetbox_core::validation::validate_one_of;
use sweetbox_db::models::payment::PaymentListParams;
use sweetbox_db::repositories::{OrderRepo, PaymentRepo};

use super::orders::{confirm_order_payment, record_failed_attempt};
use crate::error::{AppError, AppResult};
use crate::gateways::razorpay::{WebhookEvent, EVENT_PAYMENT_CAPTURED, EVENT_PAYMENT_FAILED};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// POST /api/v1/payments/webhook
///
/// Server-to-server notification from the gateway. The raw body is
/// verified against the signature header before it is parsed.
///
/// Anything that is not a problem with the request itself is acknowledged
/// with 200 so the gateway does not keep retrying: unknown events, payments
/// for orders we do not know, amount mismatches and orders that can no
/// longer be confirmed.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<impl IntoResponse> {
    let gateway = state.payment_gateway()?;
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing webhook signature".into()))?;
    if !gateway.verify_webhook(&body, signature)? {
        tracing::warn!("Rejected webhook with an invalid signature");
        return Err(AppError::BadRequest("Invalid webhook signature".into()));
    }

    let event: WebhookEvent = serde_json::from_str(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed webhook body: {e}")))?;

    let handled = match (event.event.as_str(), event.payment()) {
        (EVENT_PAYMENT_CAPTURED | EVENT_PAYMENT_FAILED, Some(payment)) => {
            let Some(gateway_order_id) = payment.order_id.as_deref() else {
                return Ok(ack(&event.event, false));
            };
            let Some(order) = OrderRepo::find_by_gateway_order_id(&state.pool, gateway_order_id).await?
            else {
                tracing::warn!(gateway_order_id, "Webhook for an unknown gateway order");
                return Ok(ack(&event.event, false));
            };

            if event.event == EVENT_PAYMENT_FAILED {
                record_failed_attempt(&state, &order, gateway_order_id, &payment.id).await?;
                true
            } else if payment.amount != order.total_paise {
                tracing::error!(
                    order_id = order.id,
                    expected = order.total_paise,
                    received = payment.amount,
                    "Captured amount does not match order total"
                );
                false
            } else {
                match confirm_order_payment(&state, &order, gateway_order_id, &payment.id).await {
                    Ok(_) => true,
                    Err(AppError::Core(e)) => {
                        tracing::warn!(order_id = order.id, error = %e, "Webhook could not confirm order");
                        false
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        (other, _) => {
            tracing::debug!(event = other, "Ignoring webhook event");
            false
        }
    };

    Ok(ack(&event.event, handled))
}

fn ack(event: &str, handled: bool) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::ok(json!({ "event": event, "handled": handled })))
}

/// GET /api/v1/admin/payments?status=&limit=&offset=
pub async fn list_payments(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaymentListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_one_of("status", status, &[STATUS_CAPTURED, STATUS_FAILED])?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let payments =
        PaymentRepo::list_filtered(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(ApiResponse::ok(payments)))
}
