//! Handlers for newsletter subscriptions and admin broadcasts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use sweetbox_core::error::CoreError;
use sweetbox_core::newsletter::{
    generate_unsubscribe_token, validate_broadcast, validate_name, validate_status,
};
use sweetbox_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sweetbox_core::types::DbId;
use sweetbox_core::validation::{normalize_email, validate_email};
use sweetbox_db::models::newsletter::{Broadcast, Subscribe, SubscriberListParams, Unsubscribe};
use sweetbox_db::repositories::NewsletterRepo;
use sweetbox_events::bus::{NEWSLETTER_BROADCAST, NEWSLETTER_SUBSCRIBED};
use sweetbox_events::payloads::{BroadcastRecipient, NewsletterBroadcast, NewsletterSubscribed};
use sweetbox_events::PlatformEvent;

use super::publish_event;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/newsletter/subscribe
///
/// Subscribes a new address or re-subscribes one that previously left.
/// An address that is already subscribed gets a 409.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(input): Json<Subscribe>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&input.email);
    validate_email(&email)?;
    let name = input.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    if let Some(name) = name {
        validate_name(name)?;
    }

    let token = generate_unsubscribe_token();
    let subscriber = NewsletterRepo::subscribe(&state.pool, &email, name, &token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "This email is already subscribed".into(),
            ))
        })?;

    publish_event(
        &state,
        PlatformEvent::new(NEWSLETTER_SUBSCRIBED).with_source("subscriber", subscriber.id),
        &NewsletterSubscribed {
            email: subscriber.email.clone(),
            name: subscriber.name.clone(),
            unsubscribe_token: subscriber.unsubscribe_token.clone(),
        },
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Subscribed", subscriber)),
    ))
}

/// POST /api/v1/newsletter/unsubscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(input): Json<Unsubscribe>,
) -> AppResult<impl IntoResponse> {
    let token = input.token.trim();
    if token.is_empty() {
        return Err(AppError::BadRequest("token is required".into()));
    }
    let subscriber = NewsletterRepo::unsubscribe_by_token(&state.pool, token)
        .await?
        .ok_or_else(|| AppError::NotFound("Unknown unsubscribe token".into()))?;

    tracing::info!(subscriber_id = subscriber.id, "Newsletter unsubscribe");

    Ok(Json(ApiResponse::new("Unsubscribed", subscriber)))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/newsletter?status=&limit=&offset=
pub async fn list_subscribers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SubscriberListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let subscribers =
        NewsletterRepo::list_filtered(&state.pool, params.status.as_deref(), limit, offset)
            .await?;
    Ok(Json(ApiResponse::ok(subscribers)))
}

/// DELETE /api/v1/admin/newsletter/{id}
pub async fn delete_subscriber(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NewsletterRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Subscriber",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/newsletter/broadcast
///
/// Queues one e-mail per current subscriber and answers 202 with the
/// recipient count. Delivery happens in the notifier.
pub async fn broadcast(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<Broadcast>,
) -> AppResult<impl IntoResponse> {
    validate_broadcast(&input.subject, &input.body)?;

    let recipients: Vec<BroadcastRecipient> = NewsletterRepo::list_subscribed(&state.pool)
        .await?
        .into_iter()
        .map(|s| BroadcastRecipient {
            email: s.email,
            unsubscribe_token: s.unsubscribe_token,
        })
        .collect();
    let count = recipients.len();

    if count > 0 {
        publish_event(
            &state,
            PlatformEvent::new(NEWSLETTER_BROADCAST).with_actor(admin.user_id),
            &NewsletterBroadcast {
                subject: input.subject.trim().to_string(),
                body: input.body,
                recipients,
            },
        );
    }

    tracing::info!(recipients = count, admin_id = admin.user_id, "Newsletter broadcast queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::new(
            "Broadcast queued",
            json!({ "recipients": count }),
        )),
    ))
}
