use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/shop/status
///
/// Whether orders are accepted right now, and when that next changes.
pub async fn shop_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let status = state.config.shop_hours.status_at(Utc::now());
    Ok(Json(ApiResponse::ok(status)))
}
