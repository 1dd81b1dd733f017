use axum::routing::get;
use axum::Router;

use crate::handlers::sitemap;
use crate::state::AppState;

/// Mounted at the site root, next to `/health`.
pub fn router() -> Router<AppState> {
    Router::new().route("/sitemap.xml", get(sitemap::sitemap))
}
