//! Session exchange: identity-provider token in, local access token out.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use sweetbox_core::error::CoreError;
use sweetbox_core::validation::{validate_max_length, validate_phone};
use sweetbox_db::models::user::{UpsertIdentity, User};
use sweetbox_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub id_token: String,
    /// Display name to use when the identity token carries none.
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

/// POST /api/v1/auth/session
///
/// Verify an identity-provider ID token, create or refresh the matching
/// user, and issue a local access token. Deleted accounts are rejected.
pub async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<SessionRequest>,
) -> AppResult<impl IntoResponse> {
    if input.id_token.trim().is_empty() {
        return Err(AppError::BadRequest("id_token is required".into()));
    }
    let fallback_name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    if let Some(name) = fallback_name {
        validate_max_length("name", name, 100)?;
    }
    if let Some(phone) = input.phone.as_deref() {
        validate_phone(phone)?;
    }

    let identity = state
        .identity_verifier()?
        .verify(input.id_token.trim())
        .await?;

    let user = UserRepo::upsert_identity(
        &state.pool,
        &UpsertIdentity {
            external_uid: identity.uid,
            email: identity.email,
            name: identity.name.or_else(|| fallback_name.map(String::from)),
            phone: input.phone.or(identity.phone),
        },
    )
    .await?;

    if user.deleted_at.is_some() {
        return Err(AppError::Core(CoreError::Forbidden(
            "This account has been deleted".into(),
        )));
    }

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "Session created");

    Ok(Json(ApiResponse::new(
        "Signed in",
        SessionResponse {
            access_token,
            token_type: "Bearer",
            expires_in: state.config.jwt.expires_in_secs(),
            user,
        },
    )))
}
