//! Route definitions for the newsletter.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::newsletter;
use crate::state::AppState;

/// Public routes mounted at `/newsletter`.
///
/// ```text
/// POST /subscribe      -> subscribe
/// POST /unsubscribe    -> unsubscribe
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscribe", post(newsletter::subscribe))
        .route("/unsubscribe", post(newsletter::unsubscribe))
}

/// Admin routes mounted at `/admin/newsletter`.
///
/// ```text
/// GET    /              -> list_subscribers
/// DELETE /{id}          -> delete_subscriber
/// POST   /broadcast     -> broadcast
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(newsletter::list_subscribers))
        .route("/{id}", delete(newsletter::delete_subscriber))
        .route("/broadcast", post(newsletter::broadcast))
}
