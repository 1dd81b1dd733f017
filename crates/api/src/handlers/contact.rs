//! Handlers for the public contact form and its admin inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sweetbox_core::contact::{validate_note, validate_status, validate_submission, validate_transition};
use sweetbox_core::error::CoreError;
use sweetbox_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sweetbox_core::types::DbId;
use sweetbox_core::validation::normalize_email;
use sweetbox_db::models::contact::{Contact, ContactListParams, CreateContact, UpdateContact};
use sweetbox_db::repositories::ContactRepo;
use sweetbox_events::bus::CONTACT_SUBMITTED;
use sweetbox_events::payloads::ContactSubmitted;
use sweetbox_events::PlatformEvent;

use super::publish_event;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

async fn load_contact(state: &AppState, id: DbId) -> AppResult<Contact> {
    ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))
}

/// POST /api/v1/contact
///
/// Stores the message and notifies the admin inbox.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(input): Json<CreateContact>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email);
    let phone = input.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
    validate_submission(&input.name, &email, phone, &input.subject, &input.message)?;

    let contact = ContactRepo::create(&state.pool, &input, &email).await?;

    publish_event(
        &state,
        PlatformEvent::new(CONTACT_SUBMITTED).with_source("contact", contact.id),
        &ContactSubmitted {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            subject: contact.subject.clone(),
            message: contact.message.clone(),
        },
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Message received", contact)),
    ))
}

/// GET /api/v1/admin/contacts?status=&limit=&offset=
pub async fn list_contacts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ContactListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let contacts =
        ContactRepo::list_filtered(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(ApiResponse::ok(contacts)))
}

/// GET /api/v1/admin/contacts/{id}
pub async fn get_contact(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contact = load_contact(&state, id).await?;
    Ok(Json(ApiResponse::ok(contact)))
}

/// PUT /api/v1/admin/contacts/{id}
///
/// Moves the message through its workflow and/or sets the admin note.
pub async fn update_contact(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContact>,
) -> AppResult<impl IntoResponse> {
    if input.status.is_none() && input.admin_note.is_none() {
        return Err(AppError::BadRequest(
            "Provide a status or an admin_note".into(),
        ));
    }
    let existing = load_contact(&state, id).await?;
    if let Some(status) = input.status.as_deref() {
        validate_status(status)?;
        validate_transition(&existing.status, status)?;
    }
    if let Some(note) = input.admin_note.as_deref() {
        validate_note(note)?;
    }

    let contact = ContactRepo::update(
        &state.pool,
        id,
        input.status.as_deref(),
        input.admin_note.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Contact",
        id,
    }))?;

    Ok(Json(ApiResponse::new("Contact updated", contact)))
}

/// DELETE /api/v1/admin/contacts/{id}
pub async fn delete_contact(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ContactRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
