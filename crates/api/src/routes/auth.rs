use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Auth routes mounted at `/auth`.
///
/// ```text
/// POST /session    -> create_session (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/session", post(auth::create_session))
}
