use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::donations;
use crate::state::AppState;

/// Customer routes mounted at `/donations`.
///
/// ```text
/// POST /        -> create_donation
/// GET  /mine    -> list_my_donations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(donations::create_donation))
        .route("/mine", get(donations::list_my_donations))
}

/// Admin routes mounted at `/admin/donations`.
///
/// ```text
/// GET    /               -> list_donations
/// DELETE /{id}           -> delete_donation
/// PUT    /{id}/status    -> update_donation_status
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(donations::list_donations))
        .route("/{id}", delete(donations::delete_donation))
        .route("/{id}/status", put(donations::update_donation_status))
}
