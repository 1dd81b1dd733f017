use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Admin routes mounted at `/admin/media`.
///
/// ```text
/// POST /           -> upload_media (multipart)
/// POST /destroy    -> destroy_media
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(media::upload_media).layer(DefaultBodyLimit::max(media::MAX_UPLOAD_BYTES)),
        )
        .route("/destroy", post(media::destroy_media))
}
