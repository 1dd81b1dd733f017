//! Bearer-token authentication extractor for Axum handlers.
//!
//! The token only proves who the caller is. Role and account status are read
//! from the `users` row on every request, so a demotion or account deletion
//! takes effect before the token expires.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sweetbox_core::error::CoreError;
use sweetbox_core::roles::ROLE_ADMIN;
use sweetbox_core::types::DbId;
use sweetbox_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Signed-in user resolved from the bearer token and the current `users` row.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// Current role from the database (`"admin"` or `"customer"`).
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_active(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Account is no longer active".into()))
            })?;

        if user.role != claims.role {
            tracing::debug!(
                user_id = user.id,
                token_role = %claims.role,
                role = %user.role,
                "Role changed since token was issued"
            );
        }

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
        })
    }
}
