use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// Public routes mounted at `/contact`.
///
/// ```text
/// POST /    -> submit_contact
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(contact::submit_contact))
}

/// Admin routes mounted at `/admin/contacts`.
///
/// ```text
/// GET    /        -> list_contacts
/// GET    /{id}    -> get_contact
/// PUT    /{id}    -> update_contact
/// DELETE /{id}    -> delete_contact
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/", get(contact::list_contacts)).route(
        "/{id}",
        get(contact::get_contact)
            .put(contact::update_contact)
            .delete(contact::delete_contact),
    )
}
