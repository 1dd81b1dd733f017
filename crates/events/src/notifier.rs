//! Background service turning platform events into e-mails.
//!
//! [`EmailNotifier`] subscribes to the [`EventBus`](crate::bus::EventBus),
//! renders the matching templates and hands each message to a
//! [`MailTransport`]. Delivery is fire-and-forget: failures are logged and
//! never reach the request that published the event.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::broadcast;

use crate::bus::{self, PlatformEvent};
use crate::delivery::email::{EmailError, MailTransport, OutgoingEmail};
use crate::payloads::{
    ContactSubmitted, DonationStatusChanged, NewsletterBroadcast, NewsletterSubscribed,
    OrderConfirmed, OrderStatusChanged,
};
use crate::templates::{self, format_rupees, order_status_label, EmailTemplates};

/// Addresses and links the notifier needs beyond the event itself.
#[derive(Debug, Clone, Default)]
pub struct NotifierSettings {
    /// Inbox that receives contact-form submissions. `None` skips them.
    pub admin_inbox: Option<String>,
}

pub struct EmailNotifier {
    transport: Option<Arc<dyn MailTransport>>,
    templates: EmailTemplates,
    settings: NotifierSettings,
}

impl EmailNotifier {
    /// Without a transport, events are logged and dropped.
    pub fn new(
        transport: Option<Arc<dyn MailTransport>>,
        templates: EmailTemplates,
        settings: NotifierSettings,
    ) -> Self {
        Self {
            transport,
            templates,
            settings,
        }
    }

    /// Run the notifier loop until the bus is closed.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.handle(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to prepare notification email"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Email notifier lagged, some events were skipped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, email notifier shutting down");
                    break;
                }
            }
        }
    }

    /// Compose and send every e-mail for one event. Returns how many were sent.
    pub async fn handle(&self, event: &PlatformEvent) -> Result<usize, EmailError> {
        let emails = self.compose(event)?;
        if emails.is_empty() {
            return Ok(0);
        }

        let Some(transport) = &self.transport else {
            tracing::debug!(
                event_type = %event.event_type,
                count = emails.len(),
                "Email transport not configured, dropping notification"
            );
            return Ok(0);
        };

        let mut sent = 0;
        for email in emails {
            let to = email.to.clone();
            match transport.send(email).await {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!(
                    error = %e,
                    to = %to,
                    event_type = %event.event_type,
                    "Notification email failed"
                ),
            }
        }
        Ok(sent)
    }

    /// Render the e-mails an event produces. Unknown event types produce none.
    pub fn compose(&self, event: &PlatformEvent) -> Result<Vec<OutgoingEmail>, EmailError> {
        match event.event_type.as_str() {
            bus::CONTACT_SUBMITTED => self.contact_submitted(payload(event)?),
            bus::NEWSLETTER_SUBSCRIBED => self.newsletter_subscribed(payload(event)?),
            bus::NEWSLETTER_BROADCAST => self.newsletter_broadcast(payload(event)?),
            bus::DONATION_STATUS_CHANGED => self.donation_status_changed(payload(event)?),
            bus::ORDER_CONFIRMED => self.order_confirmed(payload(event)?),
            bus::ORDER_STATUS_CHANGED => self.order_status_changed(payload(event)?),
            _ => Ok(Vec::new()),
        }
    }

    // -----------------------------------------------------------------------
    // Per-event composition
    // -----------------------------------------------------------------------

    fn contact_submitted(&self, p: ContactSubmitted) -> Result<Vec<OutgoingEmail>, EmailError> {
        let mut emails = Vec::with_capacity(2);
        if let Some(inbox) = &self.settings.admin_inbox {
            emails.push(self.email(
                inbox,
                format!("New contact message: {}", p.subject),
                templates::CONTACT_ADMIN,
                &p,
            )?);
        }
        emails.push(self.email(
            &p.email,
            "We received your message".to_string(),
            templates::CONTACT_ACK,
            &p,
        )?);
        Ok(emails)
    }

    fn newsletter_subscribed(
        &self,
        p: NewsletterSubscribed,
    ) -> Result<Vec<OutgoingEmail>, EmailError> {
        let mut data = serde_json::to_value(&p)?;
        data["unsubscribe_url"] = json!(self.unsubscribe_url(&p.unsubscribe_token));
        Ok(vec![self.email(
            &p.email,
            "Welcome to the Sweetbox newsletter".to_string(),
            templates::NEWSLETTER_WELCOME,
            &data,
        )?])
    }

    fn newsletter_broadcast(
        &self,
        p: NewsletterBroadcast,
    ) -> Result<Vec<OutgoingEmail>, EmailError> {
        p.recipients
            .iter()
            .map(|r| {
                let data = json!({
                    "body": p.body,
                    "unsubscribe_url": self.unsubscribe_url(&r.unsubscribe_token),
                });
                self.email(&r.email, p.subject.clone(), templates::NEWSLETTER_BROADCAST, &data)
            })
            .collect()
    }

    fn donation_status_changed(
        &self,
        p: DonationStatusChanged,
    ) -> Result<Vec<OutgoingEmail>, EmailError> {
        let data = json!({
            "donor_name": p.donor_name,
            "status": p.status,
            "admin_note": p.admin_note,
            "amount": p.amount_paise.map(format_rupees),
        });
        Ok(vec![self.email(
            &p.donor_email,
            format!("Your donation is {}", p.status),
            templates::DONATION_STATUS,
            &data,
        )?])
    }

    fn order_confirmed(&self, p: OrderConfirmed) -> Result<Vec<OutgoingEmail>, EmailError> {
        let items: Vec<_> = p
            .items
            .iter()
            .map(|i| {
                json!({
                    "product_name": i.product_name,
                    "quantity": i.quantity,
                    "line_total": format_rupees(i.line_total_paise),
                })
            })
            .collect();
        let data = json!({
            "name": p.name,
            "order_number": p.order_number,
            "hostel": p.hostel,
            "room": p.room,
            "items": items,
            "delivery_fee": format_rupees(p.delivery_fee_paise),
            "total": format_rupees(p.total_paise),
            "tracking_url": self.tracking_url(p.order_id),
        });
        Ok(vec![self.email(
            &p.email,
            format!("Order {} confirmed", p.order_number),
            templates::ORDER_CONFIRMED,
            &data,
        )?])
    }

    fn order_status_changed(&self, p: OrderStatusChanged) -> Result<Vec<OutgoingEmail>, EmailError> {
        let label = order_status_label(&p.status);
        let data = json!({
            "name": p.name,
            "order_number": p.order_number,
            "status_label": label,
            "tracking_url": self.tracking_url(p.order_id),
        });
        Ok(vec![self.email(
            &p.email,
            format!("Order {} is {label}", p.order_number),
            templates::ORDER_STATUS,
            &data,
        )?])
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn email<T: serde::Serialize>(
        &self,
        to: &str,
        subject: String,
        template: &str,
        data: &T,
    ) -> Result<OutgoingEmail, EmailError> {
        let body = self.templates.render(template, data)?;
        Ok(OutgoingEmail {
            to: to.to_string(),
            subject,
            text: body.text,
            html: body.html,
        })
    }

    fn unsubscribe_url(&self, token: &str) -> String {
        format!(
            "{}/newsletter/unsubscribe?token={token}",
            self.templates.site_url()
        )
    }

    fn tracking_url(&self, order_id: i64) -> String {
        format!("{}/orders/{order_id}", self.templates.site_url())
    }
}

fn payload<T: DeserializeOwned>(event: &PlatformEvent) -> Result<T, EmailError> {
    Ok(serde_json::from_value(event.payload.clone())?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
