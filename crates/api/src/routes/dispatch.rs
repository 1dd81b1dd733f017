use axum::routing::get;
use axum::Router;

use crate::handlers::dispatch;
use crate::state::AppState;

/// Admin routes mounted at `/admin/dispatch`.
///
/// ```text
/// GET  /    -> dispatch_board
/// POST /    -> dispatch_items
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(dispatch::dispatch_board).post(dispatch::dispatch_items),
    )
}
