use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Gateway callback mounted at `/payments`.
///
/// ```text
/// POST /webhook    -> webhook (signature-authenticated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(payments::webhook))
}

/// Admin routes mounted at `/admin/payments`.
///
/// ```text
/// GET /    -> list_payments
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/", get(payments::list_payments))
}
