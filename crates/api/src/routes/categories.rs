//! Route definitions for menu categories.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Public routes mounted at `/categories`.
///
/// ```text
/// GET /          -> list_categories
/// GET /{slug}    -> get_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list_categories))
        .route("/{slug}", get(categories::get_category))
}

/// Admin routes mounted at `/admin/categories`.
///
/// ```text
/// GET    /        -> admin_list_categories
/// POST   /        -> create_category
/// PUT    /{id}    -> update_category
/// DELETE /{id}    -> delete_category
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::admin_list_categories).post(categories::create_category),
        )
        .route(
            "/{id}",
            put(categories::update_category).delete(categories::delete_category),
        )
}
