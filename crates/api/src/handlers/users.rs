//! Handlers for the `/users/me` self-service routes and `/admin/users`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sweetbox_core::error::CoreError;
use sweetbox_core::order::{MAX_HOSTEL_LENGTH, MAX_ROOM_LENGTH};
use sweetbox_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sweetbox_core::roles::VALID_ROLES;
use sweetbox_core::types::DbId;
use sweetbox_core::validation::{validate_max_length, validate_one_of, validate_phone, validate_required};
use sweetbox_db::models::user::{UpdateProfile, User, UserListParams};
use sweetbox_db::repositories::UserRepo;

use crate::background::user_cleanup;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

async fn load_active(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_active(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Soft-delete `user` and queue the cleanup of their cart, unpaid orders
/// and newsletter subscription.
async fn delete_account(state: &AppState, user: User) -> AppResult<()> {
    if !UserRepo::soft_delete(&state.pool, user.id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }));
    }
    user_cleanup::enqueue(&state.task_queue, state.pool.clone(), user.id, user.email)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Self-service
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn get_me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let user = load_active(&state, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/v1/users/me
///
/// Update name, phone and the default delivery location. Omitted fields
/// are left unchanged.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = input.name.as_deref() {
        validate_required("name", name, 100)?;
    }
    if let Some(phone) = input.phone.as_deref() {
        validate_phone(phone)?;
    }
    if let Some(hostel) = input.hostel.as_deref() {
        validate_max_length("hostel", hostel, MAX_HOSTEL_LENGTH)?;
    }
    if let Some(room) = input.room.as_deref() {
        validate_max_length("room", room, MAX_ROOM_LENGTH)?;
    }

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(ApiResponse::new("Profile updated", user)))
}

/// DELETE /api/v1/users/me
///
/// Responds with 202: the account is closed immediately, cleanup runs in
/// the background.
pub async fn delete_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = load_active(&state, auth.user_id).await?;
    delete_account(&state, user).await?;

    tracing::info!(user_id = auth.user_id, "User deleted their account");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::new("Account deleted", serde_json::Value::Null)),
    ))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let search = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let users = UserRepo::list(&state.pool, search, params.include_deleted, limit, offset).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// PUT /api/v1/admin/users/{id}/role
pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetRoleRequest>,
) -> AppResult<impl IntoResponse> {
    validate_one_of("role", &input.role, VALID_ROLES)?;
    if id == admin.user_id && input.role != admin.role {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot change their own role".into(),
        )));
    }

    let user = UserRepo::set_role(&state.pool, id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, role = %user.role, admin_id = admin.user_id, "User role changed");

    Ok(Json(ApiResponse::new("Role updated", user)))
}

/// DELETE /api/v1/admin/users/{id}
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Use DELETE /users/me to close your own account".into(),
        )));
    }
    let user = load_active(&state, id).await?;
    delete_account(&state, user).await?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User deleted by admin");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::new("User deleted", serde_json::Value::Null)),
    ))
}
