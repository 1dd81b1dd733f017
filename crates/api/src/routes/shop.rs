use axum::routing::get;
use axum::Router;

use crate::handlers::shop;
use crate::state::AppState;

/// Public routes mounted at `/shop`.
///
/// ```text
/// GET /status    -> shop_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(shop::shop_status))
}
