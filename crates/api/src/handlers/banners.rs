//! Handlers for homepage banners.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sweetbox_core::banner::{validate_content, validate_media_type, validate_window, MEDIA_IMAGE};
use sweetbox_core::error::CoreError;
use sweetbox_core::types::DbId;
use sweetbox_core::validation::{validate_max_length, validate_required, validate_url};
use sweetbox_db::models::banner::{CreateBanner, UpdateBanner};
use sweetbox_db::repositories::BannerRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/banners
///
/// Active banners whose schedule window contains the current time.
pub async fn list_live_banners(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let banners = BannerRepo::list_live(&state.pool).await?;
    Ok(Json(ApiResponse::ok(banners)))
}

/// GET /api/v1/admin/banners
pub async fn list_banners(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let banners = BannerRepo::list_all(&state.pool).await?;
    Ok(Json(ApiResponse::ok(banners)))
}

/// POST /api/v1/admin/banners
pub async fn create_banner(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBanner>,
) -> AppResult<impl IntoResponse> {
    let media_type = input.media_type.as_deref().unwrap_or(MEDIA_IMAGE);
    validate_media_type(media_type)?;
    validate_content(
        &input.title,
        input.subtitle.as_deref(),
        &input.media_url,
        input.link_url.as_deref(),
    )?;
    validate_window(input.starts_at, input.ends_at)?;

    let banner = BannerRepo::create(&state.pool, &input, media_type).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Banner created", banner)),
    ))
}

/// PUT /api/v1/admin/banners/{id}
///
/// The schedule window is validated after merging with the stored values,
/// so moving only one end cannot invert it.
pub async fn update_banner(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBanner>,
) -> AppResult<impl IntoResponse> {
    let existing = BannerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Banner", id }))?;

    if let Some(title) = input.title.as_deref() {
        validate_required("title", title, sweetbox_core::banner::MAX_TITLE_LENGTH)?;
    }
    if let Some(subtitle) = input.subtitle.as_deref() {
        validate_max_length("subtitle", subtitle, sweetbox_core::banner::MAX_SUBTITLE_LENGTH)?;
    }
    if let Some(url) = input.media_url.as_deref() {
        validate_url("media_url", url)?;
    }
    if let Some(url) = input.link_url.as_deref() {
        validate_url("link_url", url)?;
    }
    if let Some(media_type) = input.media_type.as_deref() {
        validate_media_type(media_type)?;
    }
    validate_window(
        input.starts_at.or(existing.starts_at),
        input.ends_at.or(existing.ends_at),
    )?;

    let banner = BannerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Banner", id }))?;
    Ok(Json(ApiResponse::new("Banner updated", banner)))
}

/// DELETE /api/v1/admin/banners/{id}
pub async fn delete_banner(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !BannerRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Banner", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}
