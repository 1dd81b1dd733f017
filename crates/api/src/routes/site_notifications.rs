use axum::routing::{get, put};
use axum::Router;

use crate::handlers::site_notifications;
use crate::state::AppState;

/// Public routes mounted at `/notifications`.
///
/// ```text
/// GET /active    -> list_active
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/active", get(site_notifications::list_active))
}

/// Admin routes mounted at `/admin/notifications`.
///
/// ```text
/// GET    /        -> list_notifications
/// POST   /        -> create_notification
/// PUT    /{id}    -> update_notification
/// DELETE /{id}    -> delete_notification
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(site_notifications::list_notifications)
                .post(site_notifications::create_notification),
        )
        .route(
            "/{id}",
            put(site_notifications::update_notification)
                .delete(site_notifications::delete_notification),
        )
}
