//! Route definitions for user accounts.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Self-service routes mounted at `/users`.
///
/// ```text
/// GET    /me    -> get_me
/// PUT    /me    -> update_me
/// DELETE /me    -> delete_me
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/me",
        get(users::get_me)
            .put(users::update_me)
            .delete(users::delete_me),
    )
}

/// Admin routes mounted at `/admin/users`.
///
/// ```text
/// GET    /             -> list_users
/// DELETE /{id}         -> delete_user
/// PUT    /{id}/role    -> set_role
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/{id}", delete(users::delete_user))
        .route("/{id}/role", put(users::set_role))
}
