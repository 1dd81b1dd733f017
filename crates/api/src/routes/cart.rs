use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

/// Customer routes mounted at `/cart`.
///
/// ```text
/// GET    /                       -> get_cart
/// DELETE /                       -> clear_cart
/// PUT    /items                  -> set_item
/// DELETE /items/{product_id}     -> remove_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::get_cart).delete(cart::clear_cart))
        .route("/items", put(cart::set_item))
        .route("/items/{product_id}", delete(cart::remove_item))
}

/// Admin routes mounted at `/admin/cart`.
///
/// ```text
/// POST /reconcile    -> reconcile_all
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/reconcile", post(cart::reconcile_all))
}
