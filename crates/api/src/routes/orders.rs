//! Route definitions for orders.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Customer routes mounted at `/orders`.
///
/// ```text
/// GET  /                          -> list_my_orders
/// POST /checkout                  -> checkout
/// GET  /{id}                      -> get_order
/// POST /{id}/verify-payment       -> verify_payment
/// POST /{id}/cancel               -> cancel_order
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_my_orders))
        .route("/checkout", post(orders::checkout))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/verify-payment", post(orders::verify_payment))
        .route("/{id}/cancel", post(orders::cancel_order))
}

/// Admin routes mounted at `/admin/orders`.
///
/// ```text
/// GET /                 -> list_orders
/// PUT /{id}/status      -> update_order_status
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders))
        .route("/{id}/status", put(orders::update_order_status))
}
