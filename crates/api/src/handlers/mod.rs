//! HTTP handlers, one module per resource.

pub mod auth;
pub mod banners;
pub mod cart;
pub mod categories;
pub mod contact;
pub mod dispatch;
pub mod donations;
pub mod media;
pub mod newsletter;
pub mod orders;
pub mod payments;
pub mod products;
pub mod shop;
pub mod site_notifications;
pub mod sitemap;
pub mod users;

use serde::Serialize;
use sweetbox_events::PlatformEvent;

use crate::state::AppState;

/// Attach `payload` to `event` and publish it.
///
/// Events only drive e-mail, so a payload that fails to serialize is
/// logged and dropped instead of failing the request.
pub(crate) fn publish_event<T: Serialize>(state: &AppState, event: PlatformEvent, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => state.event_bus.publish(event.with_payload(value)),
        Err(e) => tracing::error!(
            event_type = %event.event_type,
            error = %e,
            "Failed to serialize event payload"
        ),
    }
}
