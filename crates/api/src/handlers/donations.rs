//! Handlers for donation pledges.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sweetbox_core::contact::validate_note;
use sweetbox_core::donation::{validate_pledge, validate_status, validate_transition};
use sweetbox_core::error::CoreError;
use sweetbox_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sweetbox_core::types::DbId;
use sweetbox_core::validation::normalize_email;
use sweetbox_db::models::donation::{CreateDonation, DonationListParams, UpdateDonationStatus};
use sweetbox_db::repositories::DonationRepo;
use sweetbox_events::bus::DONATION_STATUS_CHANGED;
use sweetbox_events::payloads::DonationStatusChanged;
use sweetbox_events::PlatformEvent;

use super::publish_event;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/donations
pub async fn create_donation(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDonation>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.donor_email);
    validate_pledge(
        &input.donor_name,
        &email,
        input.amount_paise,
        input.message.as_deref(),
    )?;

    let donation = DonationRepo::create(&state.pool, auth.user_id, &input, &email).await?;

    tracing::info!(donation_id = donation.id, user_id = auth.user_id, "Donation pledged");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Thank you for your pledge", donation)),
    ))
}

/// GET /api/v1/donations/mine
pub async fn list_my_donations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let donations = DonationRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(donations)))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/donations?status=&limit=&offset=
pub async fn list_donations(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<DonationListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let donations =
        DonationRepo::list_filtered(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(ApiResponse::ok(donations)))
}

/// PUT /api/v1/admin/donations/{id}/status
///
/// The update is conditional on the status read here; a concurrent change
/// makes it fail with 409 instead of overwriting.
pub async fn update_donation_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDonationStatus>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status)?;
    if let Some(note) = input.admin_note.as_deref() {
        validate_note(note)?;
    }

    let existing = DonationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Donation",
            id,
        }))?;
    validate_transition(&existing.status, &input.status)?;

    let donation = DonationRepo::update_status(
        &state.pool,
        id,
        &existing.status,
        &input.status,
        input.admin_note.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Donation status changed concurrently; reload and retry".into(),
        ))
    })?;

    tracing::info!(
        donation_id = id,
        from = %existing.status,
        to = %donation.status,
        admin_id = admin.user_id,
        "Donation status changed"
    );

    publish_event(
        &state,
        PlatformEvent::new(DONATION_STATUS_CHANGED)
            .with_source("donation", donation.id)
            .with_actor(admin.user_id),
        &DonationStatusChanged {
            donor_name: donation.donor_name.clone(),
            donor_email: donation.donor_email.clone(),
            amount_paise: donation.amount_paise,
            status: donation.status.clone(),
            admin_note: donation.admin_note.clone(),
        },
    );

    Ok(Json(ApiResponse::new("Donation updated", donation)))
}

/// DELETE /api/v1/admin/donations/{id}
pub async fn delete_donation(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !DonationRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Donation",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
