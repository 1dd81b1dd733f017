//! Handlers for site-wide notification strips.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sweetbox_core::error::CoreError;
use sweetbox_core::site_notification::{
    validate_content, validate_kind, KIND_INFO, MAX_MESSAGE_LENGTH, MAX_TITLE_LENGTH,
};
use sweetbox_core::types::{DbId, Timestamp};
use sweetbox_core::validation::validate_required;
use sweetbox_db::models::site_notification::{CreateSiteNotification, UpdateSiteNotification};
use sweetbox_db::repositories::SiteNotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

fn validate_schedule(
    starts_at: Option<Timestamp>,
    expires_at: Option<Timestamp>,
) -> Result<(), CoreError> {
    match (starts_at, expires_at) {
        (Some(start), Some(end)) if end <= start => Err(CoreError::Validation(
            "expires_at must be later than starts_at".into(),
        )),
        _ => Ok(()),
    }
}

/// GET /api/v1/notifications/active
pub async fn list_active(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let notifications = SiteNotificationRepo::list_live(&state.pool).await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

/// GET /api/v1/admin/notifications
pub async fn list_notifications(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let notifications = SiteNotificationRepo::list_all(&state.pool).await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

/// POST /api/v1/admin/notifications
pub async fn create_notification(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSiteNotification>,
) -> AppResult<impl IntoResponse> {
    let kind = input.kind.as_deref().unwrap_or(KIND_INFO);
    validate_kind(kind)?;
    validate_content(&input.title, &input.message)?;
    validate_schedule(input.starts_at, input.expires_at)?;

    let notification =
        SiteNotificationRepo::create(&state.pool, &input, kind, admin.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Notification created", notification)),
    ))
}

/// PUT /api/v1/admin/notifications/{id}
pub async fn update_notification(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSiteNotification>,
) -> AppResult<impl IntoResponse> {
    let existing = SiteNotificationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))?;

    if let Some(kind) = input.kind.as_deref() {
        validate_kind(kind)?;
    }
    if let Some(title) = input.title.as_deref() {
        validate_required("title", title, MAX_TITLE_LENGTH)?;
    }
    if let Some(message) = input.message.as_deref() {
        validate_required("message", message, MAX_MESSAGE_LENGTH)?;
    }
    validate_schedule(
        input.starts_at.or(existing.starts_at),
        input.expires_at.or(existing.expires_at),
    )?;

    let notification = SiteNotificationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))?;
    Ok(Json(ApiResponse::new("Notification updated", notification)))
}

/// DELETE /api/v1/admin/notifications/{id}
pub async fn delete_notification(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SiteNotificationRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
